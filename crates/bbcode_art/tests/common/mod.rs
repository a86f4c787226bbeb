/// Removes `[color=#xxxxxx]` and `[/color]` tags from one line.
pub fn strip_tags(line: &str) -> String {
    let mut out = String::new();
    let mut rest = line;
    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let end = rest[start..].find(']').expect("unterminated tag") + start;
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}
