use scraper::ElementRef;

/// Trim and collapse every whitespace run (spaces, tabs, line breaks) into one space
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All descendant text of an element, cleaned
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}
