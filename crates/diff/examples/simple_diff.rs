use buffer_diff::{DiffConfig, DiffLineType, TextDiff};

fn main() {
    // Two sample texts to compare
    let text1 = "This is the first line.\nHere is the second line.\nAnd the third line.";
    let text2 = "This is the first line.\nThis is a completely different second line.\nAnd the third line.\nPlus a new fourth line.";

    println!("Unified diff:");
    print!("{}", TextDiff::unified_diff(text1, text2, 1));

    let diff = TextDiff::diff(text1, text2);

    println!("\nDiff statistics:");
    println!("  Total hunks: {}", diff.hunk_count());
    println!("  Added lines: {}", diff.added_lines());
    println!("  Deleted lines: {}", diff.deleted_lines());
    println!("  Unchanged lines: {}", diff.unchanged_lines());

    println!("\nHunks with line types:");
    for (i, hunk) in diff.hunks().iter().enumerate() {
        println!("Hunk {}: {}", i + 1, hunk.status);
        for line in &hunk.lines {
            match line.kind {
                DiffLineType::OldOnly => println!("  \x1b[31m{}\x1b[0m", line),
                DiffLineType::NewOnly => println!("  \x1b[32m{}\x1b[0m", line),
                DiffLineType::Both => println!("  {}", line),
            }
        }
    }

    // A whole PO entry stays one block with full context
    let old_entry = ["#: src/main.c:12", "msgid \"Open\"", "msgstr \"Abrir\""];
    let new_entry = ["#: src/main.c:14", "msgid \"Open\"", "msgstr \"Abrir\""];
    let entry_diff = DiffConfig::full_context().diff_lines(&old_entry, &new_entry);

    println!("\nEntry diff:");
    for line in entry_diff.body_lines() {
        println!("{}", line);
    }
}
