//! Lexical patterns for heading and title detection.

use regex::{Regex, RegexSet};

use crate::detect::Language;

/// Compiled lexical patterns shared by the classifier and title detector.
pub struct HeadingPatterns {
    skip: RegexSet,
    structural_latin: RegexSet,
    structural_cjk: RegexSet,
    structural_ko: RegexSet,
    structural_ar: RegexSet,
    decimal_numbering: Regex,
    roman_numbering: Regex,
    letter_numbering: Regex,
    chapter_word: Regex,
    cjk_chapter: Regex,
    cjk_section: Regex,
    ko_chapter: Regex,
    ko_section: Regex,
}

impl HeadingPatterns {
    /// Compile all patterns.
    pub fn new() -> Self {
        let set = |patterns: &[&str]| RegexSet::new(patterns).expect("static heading patterns");
        let re = |pattern: &str| Regex::new(pattern).expect("static heading pattern");

        Self {
            // Matched against lowercase text
            skip: set(&[
                r"^\.+$",
                r"^\d+\.?\s*$",
                r"^[a-z]\)?\s*$",
                r"^page\s+\d+",
                r"^\d+\s*(of|/)\s*\d+$",
                r"^[-–—]\s*\d+\s*[-–—]$",
                r"^copyright",
                r"^©",
                r"^version\s+[\d.]+$",
                r"^\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}$",
                r"^\d{4}[/.-]\d{1,2}[/.-]\d{1,2}$",
                r"^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}$",
                r"^\d{1,2}\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+\d{4}$",
                r"^(www\.|https?://)",
                r"^[ivxlcdm]+\.?$",
                r"\.{4,}\s*\d*$",
                r"(\.\s){3,}\s*\d*$",
            ]),
            structural_latin: set(&[
                r"^\d{1,3}\.?\s+\p{Lu}",
                r"^\d{1,3}(\.\d{1,3})+\.?\s+\p{L}",
                r"^[IVXLC]+\.\s+\p{Lu}",
                r"^[A-Z]\.\s+\p{Lu}",
                r"(?i)^(chapter|section|part|appendix|annex)\b",
            ]),
            structural_cjk: set(&[
                r"^第[一二三四五六七八九十百\d]+[章節节部篇]",
                r"^[一二三四五六七八九十]+[、.]",
                r"^\d+\.",
                r"^[●○■]",
                r"^【.*】$",
            ]),
            structural_ko: set(&[
                r"^제[일이삼사오육칠팔구십\d]+[장절]",
                r"^[일이삼사오육칠팔구십\d]+\.",
            ]),
            structural_ar: set(&[r"^[٠-٩]+\.", r"^[0-9]+\."]),
            decimal_numbering: re(r"^(\d{1,3}(?:\.\d{1,3})*)\.?\s+\S"),
            roman_numbering: re(r"^[IVXLC]+\.\s+\p{Lu}"),
            letter_numbering: re(r"^[A-Z]\.\s+\p{Lu}"),
            chapter_word: re(r"(?i)^(chapter|part)\s+\w+"),
            cjk_chapter: re(r"^第[一二三四五六七八九十百\d]+[章部篇]"),
            cjk_section: re(r"^第[一二三四五六七八九十百\d]+[節节]"),
            ko_chapter: re(r"^제[일이삼사오육칠팔구십\d]+장"),
            ko_section: re(r"^제[일이삼사오육칠팔구십\d]+절"),
        }
    }

    /// Whether the text is a page number, date, URL, TOC leader line or similar.
    pub fn is_skippable(&self, text: &str) -> bool {
        self.skip.is_match(&text.trim().to_lowercase())
    }

    /// Whether the text opens with a structural heading marker.
    pub fn is_structural(&self, text: &str, language: Language) -> bool {
        let text = text.trim();
        if self.structural_latin.is_match(text) {
            return true;
        }
        match language {
            Language::Ja | Language::Zh => self.structural_cjk.is_match(text),
            Language::Ko => self.structural_ko.is_match(text),
            Language::Ar => self.structural_ar.is_match(text),
            Language::En => false,
        }
    }

    /// Nesting depth implied by an explicit numbering prefix.
    ///
    /// "1." and "Chapter 2" give 1, "1.2" gives 2, "1.2.3" gives 3.
    /// Roman numerals give 1 and capital letters give 2.
    pub fn numbering_depth(&self, text: &str) -> Option<u8> {
        let text = text.trim();
        if let Some(caps) = self.decimal_numbering.captures(text) {
            let components = caps[1].split('.').filter(|c| !c.is_empty()).count();
            return Some(components.min(3) as u8);
        }
        if self.chapter_word.is_match(text)
            || self.cjk_chapter.is_match(text)
            || self.ko_chapter.is_match(text)
            || self.roman_numbering.is_match(text)
        {
            return Some(1);
        }
        if self.cjk_section.is_match(text)
            || self.ko_section.is_match(text)
            || self.letter_numbering.is_match(text)
        {
            return Some(2);
        }
        None
    }
}

impl Default for HeadingPatterns {
    fn default() -> Self {
        Self::new()
    }
}
