use crate::app::models::Collection;

pub struct OutputGenerator;

impl OutputGenerator {
    /// Instruction lines go through verbatim; they are data, not behavior.
    pub fn generate_instructions(instructions: &[String]) -> String {
        let mut out = String::from("===== LLM INSTRUCTIONS =====\n");
        for line in instructions {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }

    pub fn generate_files(collection: &Collection) -> String {
        let mut out = String::new();
        for file in &collection.files {
            out.push_str(&format!("===== FILE: {} =====\n", file.relative_path));
            out.push_str(&file.content);
            out.push_str("\n\n");
        }
        out
    }

    pub fn generate_skipped(collection: &Collection) -> String {
        let mut out = String::from("===== SKIPPED FILES =====\n");
        for skip in &collection.skipped {
            out.push_str(&format!("{}: {}\n", skip.path, skip.reason));
        }
        out
    }

    /// Assemble the whole document: instructions, optional host summary,
    /// file contents, then the skip trailer when anything was skipped.
    pub fn render(
        instructions: &[String],
        system_summary: Option<&str>,
        collection: &Collection,
    ) -> String {
        let mut out = String::new();

        if !instructions.is_empty() {
            out.push_str(&Self::generate_instructions(instructions));
        }

        if let Some(summary) = system_summary {
            out.push_str("===== SYSTEM SETUP SUMMARY =====\n");
            out.push_str(summary);
            if !summary.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str(&Self::generate_files(collection));

        if !collection.skipped.is_empty() {
            out.push_str(&Self::generate_skipped(collection));
        }

        out
    }
}
