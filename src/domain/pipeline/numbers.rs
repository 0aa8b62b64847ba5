//! 数字规范化
//!
//! `1234` → `one thousand, two hundred and thirty four`

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::parts::VoicePart;

/// 千位分组可用逗号、空白或两者组合；只认 ASCII 数字
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([-+])?([0-9]+(?:\s*,?\s*[0-9]{3})*)(?:\.([0-9]+))?").unwrap());

const UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "ten", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// 三位一组的量级名（长级差），超出范围的整数逐位读出
pub const MAGNITUDES: [&str; 41] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
    "nonillion",
    "decillion",
    "undecillion",
    "duodecillion",
    "tredecillion",
    "quattuordecillion",
    "quindecillion",
    "sexdecillion",
    "septendecillion",
    "octodecillion",
    "novemdecillion",
    "vigintillion",
    "unvigintillion",
    "dovigintillion",
    "trevigintillion",
    "quattuorvigintillion",
    "quinvigintillion",
    "sexvigintillion",
    "septenvigintillion",
    "octovigintillion",
    "novemvigintillion",
    "trigintillion",
    "untrigintillion",
    "dotrigintillion",
    "tretrigintillion",
    "quattuortrigintillion",
    "quintrigintillion",
    "sextrigintillion",
    "septentrigintillion",
    "octotrigintillion",
    "novemtrigintillion",
];

fn digit_value(c: char) -> Option<usize> {
    c.to_digit(10).map(|d| d as usize)
}

/// 逐位读
fn read_digits(digits: &str) -> Vec<&'static str> {
    digits.chars().filter_map(digit_value).map(|d| UNITS[d]).collect()
}

/// 0..=999 的读法，0 返回空串
fn read_chunk(chunk: &[usize]) -> String {
    let (hundreds, tens, ones) = match *chunk {
        [h, t, o] => (h, t, o),
        [t, o] => (0, t, o),
        [o] => (0, 0, o),
        _ => return String::new(),
    };

    let rest = tens * 10 + ones;
    let rest_words = match rest {
        0 => String::new(),
        1..=19 => UNITS[rest].to_string(),
        _ if ones == 0 => TENS[tens].to_string(),
        _ => format!("{} {}", TENS[tens], UNITS[ones]),
    };

    match (hundreds, rest_words.is_empty()) {
        (0, _) => rest_words,
        (h, true) => format!("{} hundred", UNITS[h]),
        (h, false) => format!("{} hundred and {}", UNITS[h], rest_words),
    }
}

/// 基数读法
pub fn read_cardinal(integer: &str) -> String {
    let digits: Vec<usize> = integer.chars().filter_map(digit_value).collect();
    if digits.is_empty() {
        return String::new();
    }
    if digits[0] == 0 {
        return read_digits(integer).join(" ");
    }

    let chunks: Vec<&[usize]> = digits.rchunks(3).collect();
    if chunks.len() > MAGNITUDES.len() {
        return read_digits(integer).join(" ");
    }

    chunks
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(i, chunk)| {
            let words = read_chunk(chunk);
            if words.is_empty() {
                return None;
            }
            Some(match MAGNITUDES[i] {
                "" => words,
                magnitude => format!("{} {}", words, magnitude),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_number(sign: Option<&str>, integer: &str, decimal: Option<&str>) -> String {
    let mut pieces: Vec<String> = Vec::new();
    if sign == Some("-") {
        pieces.push("minus".to_string());
    }
    let integer: String = integer.chars().filter(char::is_ascii_digit).collect();
    pieces.push(read_cardinal(&integer));
    if let Some(decimal) = decimal {
        let digits = read_digits(decimal);
        if !digits.is_empty() {
            pieces.push(format!("point {}", digits.join(" ")));
        }
    }
    pieces.retain(|p| !p.is_empty());
    pieces.join(" ")
}

fn rewrite(text: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut last = 0;

    for caps in NUMBER.captures_iter(text) {
        let (Some(whole), Some(integer)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        pieces.push(text[last..whole.start()].trim().to_string());
        pieces.push(read_number(
            caps.get(1).map(|m| m.as_str()),
            integer.as_str(),
            caps.get(3).map(|m| m.as_str()),
        ));
        last = whole.end();
    }
    pieces.push(text[last..].trim().to_string());

    pieces.retain(|p| !p.is_empty());
    pieces.join(" ")
}

/// 只处理 Raw/Currency 片段
pub fn normalize_numbers(parts: Vec<VoicePart>) -> Vec<VoicePart> {
    parts
        .into_iter()
        .map(|part| {
            if part.part_type.is_normalizable() && NUMBER.is_match(&part.value) {
                let value = rewrite(part.value.trim());
                part.with_value(value)
            } else {
                part
            }
        })
        .collect()
}
