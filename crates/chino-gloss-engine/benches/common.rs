// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

/// A taxonomy with `groups` particles, each `depth` levels deep and
/// `width` entries wide per level.
#[allow(dead_code)]
pub fn generate_outline(groups: usize, depth: usize, width: usize) -> String {
    let mut content = String::from("Particle taxonomy\n\nNotes above the first entry are ignored.\n\n");

    for group in 1..=groups {
        content.push_str(&format!("{group} particle{group}\n"));
        generate_children(&mut content, 1, depth, width);
    }

    content
}

#[allow(dead_code)]
fn generate_children(content: &mut String, level: usize, depth: usize, width: usize) {
    if level >= depth {
        return;
    }

    for i in 1..=width {
        let indent = "\t".repeat(level);
        content.push_str(&format!("{indent}{i} usage {i} at level {level}\n"));
        generate_children(content, level + 1, depth, width);
    }
}

/// Morphemes of a long sentence with plenty of repeated particles.
#[allow(dead_code)]
pub fn generate_tokens(clauses: usize) -> Vec<String> {
    let clause = ["私", "の", "友達", "は", "東京", "で", "本", "を", "読ん", "だ", "。"];
    (0..clauses)
        .flat_map(|i| {
            clause
                .iter()
                .map(move |t| if *t == "友達" { format!("友達{i}") } else { t.to_string() })
        })
        .collect()
}
