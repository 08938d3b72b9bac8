/// A synthetic page with `sections` sections, as MDX text plus the storage
/// markup it was generated from.
pub struct SyntheticPage {
    pub mdx: String,
    pub markup: String,
}

pub fn generate_page(sections: usize) -> SyntheticPage {
    let mut mdx = String::new();
    let mut markup = String::new();

    for section in 0..sections {
        mdx.push_str(&format!("## Section {section}\n\n"));
        markup.push_str(&format!("<h2>Section {section}</h2>"));

        mdx.push_str(&format!(
            "Paragraph {section} with **bold** text and `code` spanning a realistic sentence length.\n\n"
        ));
        markup.push_str(&format!(
            "<p>Paragraph {section} with <strong>bold</strong> text and <code>code</code> spanning a realistic sentence length.</p>"
        ));

        mdx.push_str("- First item\n- Second item\n- Third item\n\n");
        markup.push_str("<ul><li><p>First item</p></li><li><p>Second item</p></li><li><p>Third item</p></li></ul>");

        mdx.push_str(&format!("| Key | Value |\n| --- | --- |\n| k{section} | v{section} |\n\n"));
        markup.push_str(&format!(
            "<table><tbody><tr><th><p>Key</p></th><th><p>Value</p></th></tr><tr><td><p>k{section}</p></td><td><p>v{section}</p></td></tr></tbody></table>"
        ));
    }

    SyntheticPage { mdx, markup }
}

/// Rewrites every `every`-th paragraph of `mdx`.
pub fn edit_paragraphs(mdx: &str, every: usize) -> String {
    let mut count = 0;
    mdx.lines()
        .map(|line| {
            if line.starts_with("Paragraph ") {
                count += 1;
                if count % every == 0 {
                    return line.replace("realistic", "representative");
                }
            }
            line.to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
