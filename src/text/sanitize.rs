use super::Font;

/// Replace every char `font` cannot render with a single space.
///
/// The replacement is one-for-one, so the char count never changes and
/// width estimates made on the raw string stay valid.
pub fn sanitize(text: &str, font: &Font) -> String {
    let mut replaced = 0usize;
    let out: String = text
        .chars()
        .map(|c| {
            if font.supports(c) {
                c
            } else {
                replaced += 1;
                ' '
            }
        })
        .collect();
    if replaced > 0 {
        log::debug!("Replaced {} unsupported char(s) in {:?}", replaced, text);
    }
    out
}
