use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Backends accept ISO 639-1 codes, optionally followed by a region or
/// script subtag (`pt-BR`, `zh-Hans`). Validation looks at the primary
/// subtag only and leaves the code itself untouched.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Source language value asking the backend to detect the language
pub const AUTO_DETECT: &str = "auto";

// @returns: ISO 639-2/T code for bibliographic codes that differ from it
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(part2t)
}

// @returns: Lowercased primary subtag ("pt" for "pt-BR")
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// True if the code asks for source language detection
pub fn is_auto(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(AUTO_DETECT)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let primary = primary_subtag(code);

    match primary.len() {
        2 if Language::from_639_1(&primary).is_some() => return Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&primary).is_some() => return Ok(LanguageCodeType::Part2T),
        3 if part2b_to_part2t(&primary).is_some() => return Ok(LanguageCodeType::Part2B),
        _ => {}
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let primary = primary_subtag(code);

    match validate_language_code(code) {
        Ok(LanguageCodeType::Part1) => {
            let lang = Language::from_639_1(&primary)
                .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;
            Ok(lang.to_639_3().to_string())
        }
        Ok(LanguageCodeType::Part2T) => Ok(primary),
        Ok(LanguageCodeType::Part2B) => part2b_to_part2t(&primary)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
        Err(_) => Err(anyhow!("Cannot normalize invalid language code: {}", code)),
    }
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the language name from a code, "auto-detected" for the auto source
pub fn get_language_name(code: &str) -> Result<String> {
    if is_auto(code) {
        return Ok("auto-detected".to_string());
    }

    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
