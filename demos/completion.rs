//! Example: prefix completion over a small word-frequency list.
//!
//! Builds a dictionary mapping words to how often they occur, then prints
//! the completions of a few prefixes, most frequent first, and the stored
//! words that are prefixes of a longer query.
//!
//! Run with: cargo run --example completion

use dawgdict::{Builder, Dictionary};

fn complete<'d>(dict: &'d Dictionary<u32>, prefix: &str, limit: usize) -> Vec<(String, &'d u32)> {
    let mut hits: Vec<_> = dict
        .enumerate(prefix)
        .map(|(key, freq)| (String::from_utf8_lossy(&key).into_owned(), freq))
        .collect();
    hits.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(&b.0)));
    hits.truncate(limit);
    hits
}

fn main() {
    let mut words = vec![
        ("band", 120),
        ("banana", 75),
        ("bandit", 30),
        ("ban", 210),
        ("bank", 340),
        ("banker", 44),
        ("cake", 90),
        ("cane", 12),
        ("can", 500),
        ("candle", 61),
    ];
    words.sort();

    let mut builder = Builder::with_capacity(words.len());
    for (word, freq) in words {
        builder.insert(word, freq);
    }
    let dict = match builder.build() {
        Ok(dict) => dict,
        Err(err) => {
            eprintln!("failed to build dictionary: {err}");
            return;
        }
    };
    println!("{} words", dict.len());

    for prefix in ["ban", "can", "x"] {
        let hits = complete(&dict, prefix, 3);
        if hits.is_empty() {
            println!("{prefix:>4}: no completions");
        } else {
            let shown: Vec<String> = hits.iter().map(|(w, f)| format!("{w} ({f})")).collect();
            println!("{prefix:>4}: {}", shown.join(", "));
        }
    }

    let query = "bankers";
    let prefixes: Vec<_> = dict
        .common_prefixes(query)
        .map(|(key, _)| String::from_utf8_lossy(key).into_owned())
        .collect();
    println!("prefixes of {query:?}: {prefixes:?}");
}
