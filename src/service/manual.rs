use crate::db::{CHANGESETS, ChangeSet, VERIFY_COLUMNS_QUERY};
use std::fmt::Write as _;

const RULE_WIDTH: usize = 80;

/// Dashboard instructions plus every change-set, for pasting into the
/// Supabase SQL editor when the function endpoint is unavailable.
pub fn manual_instructions() -> String {
    render(CHANGESETS)
}

fn render(changesets: &[ChangeSet]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "MANUAL EXECUTION\n");
    let _ = writeln!(out, "Steps:");
    let _ = writeln!(out, "1. Open: https://supabase.com/dashboard");
    let _ = writeln!(out, "2. Select your project");
    let _ = writeln!(out, "3. Click \"SQL Editor\"");
    let _ = writeln!(out, "4. Click \"New Query\"");
    for i in 0..changesets.len() {
        let _ = writeln!(
            out,
            "{}. Copy & paste MIGRATION {} below, then execute",
            i + 5,
            i + 1
        );
    }
    let _ = writeln!(out);

    for (i, cs) in changesets.iter().enumerate() {
        let _ = writeln!(out, "{rule}\nMIGRATION {}: {}\n{rule}", i + 1, cs.name);
        let _ = writeln!(out, "{}\n", cs.statement);
    }

    let _ = writeln!(out, "{rule}\nVERIFICATION (run after migrations)\n{rule}");
    let _ = writeln!(out, "{VERIFY_COLUMNS_QUERY}\n");
    let _ = writeln!(
        out,
        "Expect one row each for is_freebie, max_storage_bytes and owner_name."
    );
    out
}
