//! Test-vector generator for cross-checking device firmware.
//!
//! Run with: cargo run --example vectors -- [--format json|c] ABC123 [MORE_IDS...]
//!
//! Outputs (stdout, one format per run):
//! - `json` (default): one object per identifier with every stage of the chain
//! - `c`: a C array of `{ id, key }` pairs, ready to paste into firmware unit tests

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
struct Args {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: Format,

    /// Device identifiers to derive vectors for.
    #[arg(default_value = "ABC123")]
    ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    C,
}

fn main() {
    let args = Args::parse();

    let mut traces = Vec::with_capacity(args.ids.len());
    for id in &args.ids {
        match devkey::derive::trace(id) {
            Ok(trace) => traces.push((id.as_str(), trace)),
            Err(e) => eprintln!("skipping {id:?}: {e}"),
        }
    }

    eprintln!("salt: {:?}", devkey::derive::SALT);
    match args.format {
        Format::Json => {
            for (id, trace) in &traces {
                println!("{}", serde_json::json!({ "device_id": id, "trace": trace }));
            }
        }
        Format::C => {
            let pairs: Vec<(&str, &str)> =
                traces.iter().map(|(id, t)| (*id, t.key.as_str())).collect();
            print!("{}", c_fixture(&pairs));
        }
    }
}

/// Render `(id, key)` pairs as a C array definition.
fn c_fixture(pairs: &[(&str, &str)]) -> String {
    let mut out = String::from(
        "static const struct { const char *id; const char *key; } DEVICE_KEY_VECTORS[] = {\n",
    );
    for (id, key) in pairs {
        out.push_str(&format!("    {{ {}, {} }},\n", c_string(id), c_string(key)));
    }
    out.push_str("};\n");
    out
}

/// Quote `s` as a C string literal over its UTF-8 bytes.
///
/// Non-printable and non-ASCII bytes become three-digit octal escapes, which
/// unlike `\x` cannot swallow a following hex digit.
fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for &b in s.as_bytes() {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            // Keeps `??x` from being read as a trigraph.
            b'?' => out.push_str("\\?"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out.push('"');
    out
}
