//! 货币金额规范化
//!
//! `$5.20` → `5 dollars and 20 cents`，数字本身留给数字规范化处理

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::parts::{PartType, VoicePart};

/// 符号在前（符号与数字之间允许空白和符号后的正负号）或符号在数字之后（允许空白）
/// 千位分组可用逗号、空白或两者组合；只认 ASCII 数字
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([-+])?\s*(?:([$£€])\s*([-+])?\s*([0-9]+(?:\s*,?\s*[0-9]{3})*)?(?:\.([0-9]+))?|([0-9]+(?:\s*,?\s*[0-9]{3})*)?(?:\.([0-9]+))?\s*([$£€]))",
    )
    .unwrap()
});

struct Unit {
    singular: &'static str,
    plural: &'static str,
    cent: &'static str,
    cents: &'static str,
}

fn unit(symbol: char) -> Option<Unit> {
    match symbol {
        '$' => Some(Unit {
            singular: "dollar",
            plural: "dollars",
            cent: "cent",
            cents: "cents",
        }),
        '£' => Some(Unit {
            singular: "pound",
            plural: "pounds",
            cent: "penny",
            cents: "pence",
        }),
        '€' => Some(Unit {
            singular: "euro",
            plural: "euros",
            cent: "cent",
            cents: "cents",
        }),
        _ => None,
    }
}

/// 从匹配中构造读法，无法规范化时返回 None（原文保留）
fn amount_phrase(caps: &Captures) -> Option<String> {
    let sign_before = caps.get(1).map(|m| m.as_str());
    let sign_after = caps.get(3).map(|m| m.as_str());
    if sign_before.is_some() && sign_after.is_some() {
        return None;
    }
    let negative = sign_before.or(sign_after) == Some("-");

    let (symbol, integer, decimal) = match caps.get(2) {
        Some(symbol) => (symbol, caps.get(4), caps.get(5)),
        None => (caps.get(8)?, caps.get(6), caps.get(7)),
    };
    if integer.is_none() && decimal.is_none() {
        return None;
    }

    let unit = unit(symbol.as_str().chars().next()?)?;
    let integer: String = integer
        .map(|m| m.as_str().chars().filter(char::is_ascii_digit).collect())
        .unwrap_or_default();
    let unit_name = if integer == "1" { unit.singular } else { unit.plural };

    let phrase = match decimal.map(|m| m.as_str()) {
        Some(decimal) if decimal.len() <= 2 => {
            let decimal = if decimal.len() == 1 {
                format!("{}0", decimal)
            } else {
                decimal.to_string()
            };
            let cents = if decimal == "01" { unit.cent } else { unit.cents };
            let spoken = decimal.strip_prefix('0').unwrap_or(&decimal);
            let cents_phrase = format!("{} {}", spoken, cents);

            if integer.chars().all(|c| c == '0') {
                cents_phrase
            } else {
                format!("{} {} and {}", integer, unit_name, cents_phrase)
            }
        }
        Some(decimal) => {
            let integer = if integer.is_empty() { "0" } else { integer.as_str() };
            format!("{}.{} {}", integer, decimal, unit_name)
        }
        None => format!("{} {}", integer, unit_name),
    };

    Some(if negative {
        format!("minus {}", phrase)
    } else {
        phrase
    })
}

/// 把未被识别为金额的货币符号替换为单位名
fn speak_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match unit(ch) {
            Some(unit) => {
                if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push_str(unit.singular);
                if chars.peek().is_some_and(|c| !c.is_whitespace()) {
                    out.push(' ');
                }
            }
            None => out.push(ch),
        }
    }
    out
}

fn push_raw(out: &mut Vec<VoicePart>, source: &VoicePart, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        out.push(source.with_value(speak_symbols(fragment)));
    }
}

fn split_amounts(part: VoicePart) -> Vec<VoicePart> {
    if part.part_type != PartType::Raw || part.value.is_empty() {
        return vec![part];
    }

    let text = part.value.trim();
    let mut out = Vec::new();
    let mut last = 0;

    for caps in AMOUNT.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some(phrase) = amount_phrase(&caps) else {
            tracing::trace!(amount = whole.as_str(), "Currency amount skipped");
            continue;
        };

        let matched = whole.as_str();
        let start = whole.start() + (matched.len() - matched.trim_start().len());
        let end = whole.end() - (matched.len() - matched.trim_end().len());

        let mut value = String::new();
        if text[..start].chars().next_back().is_some_and(|c| !c.is_whitespace()) {
            value.push(' ');
        }
        value.push_str(&phrase);
        if text[end..].chars().next().is_some_and(|c| !c.is_whitespace()) {
            value.push(' ');
        }

        push_raw(&mut out, &part, &text[last..start]);
        out.push(part.with_value(value).with_type(PartType::Currency));
        last = end;
    }

    push_raw(&mut out, &part, &text[last..]);
    out
}

/// 只处理 Raw 片段；金额前后的文本各自成为 Raw 片段
pub fn normalize_currency(parts: Vec<VoicePart>) -> Vec<VoicePart> {
    parts.into_iter().flat_map(split_amounts).collect()
}
