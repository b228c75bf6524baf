use std::fmt::Write;

use crate::disk::MasterBootRecord;

/// Graphviz source for a one-row table: the MBR cell followed by one cell per
/// occupied partition, in slot order.
pub fn generate_dot(mbr: &MasterBootRecord) -> String {
    let mut dot = String::new();

    dot.push_str("digraph G {\n");
    dot.push_str("    node [shape=none];\n");
    dot.push_str("    rankdir=\"LR\";\n");
    dot.push_str("    struct1 [label=<<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">\n");
    dot.push_str("    <TR>");
    dot.push_str("<TD BGCOLOR=\"yellow\">MBR</TD>");

    for (index, partition) in mbr.occupied() {
        let mut label = partition.name();
        if label.is_empty() {
            label = format!("Partition{}", index + 1);
        }
        // String 写入不会失败
        let _ = write!(dot, "<TD BGCOLOR=\"green\">{}</TD>", escape_html(&label));
    }

    if mbr.free_space().map_or(false, |free| free > 0) {
        dot.push_str("<TD BGCOLOR=\"lightgray\">Free</TD>");
    }

    dot.push_str("</TR>\n");
    dot.push_str("    </TABLE>>];\n");
    dot.push_str("}\n");
    dot
}

/// Labels live inside an HTML-like label, so markup characters are escaped.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
