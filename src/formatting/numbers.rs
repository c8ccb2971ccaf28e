//! 紧凑数字表示（`1200` → `1.2K` / `1,2 mil`）

use crate::i18n::Locale;

/// 数量级单位，从小到大
const UNITS: [u128; 4] = [1_000, 1_000_000, 1_000_000_000, 1_000_000_000_000];

fn suffix(locale: Locale, index: usize) -> &'static str {
    match locale {
        Locale::EnUs => ["K", "M", "B", "T"][index],
        Locale::PtBr => ["mil", "mi", "bi", "tri"][index],
    }
}

/// 按语言区域把数字缩写为紧凑形式
///
/// 小于 10 的值保留一位小数（小数为 0 时省略），其余四舍五入到整数；
/// 进位到 1000 时升到下一个单位。
pub fn compact_number(value: u64, locale: Locale) -> String {
    let n = u128::from(value);
    if n < UNITS[0] {
        return value.to_string();
    }

    let mut index = UNITS.iter().rposition(|unit| n >= *unit).unwrap_or(0);
    loop {
        let unit = UNITS[index];
        let tenths = (n * 20 + unit) / (2 * unit);

        if tenths < 100 {
            return render(locale, index, tenths / 10, Some(tenths % 10));
        }

        let whole = (n * 2 + unit) / (2 * unit);
        if whole >= 1000 && index + 1 < UNITS.len() {
            index += 1;
            continue;
        }
        return render(locale, index, whole, None);
    }
}

fn render(locale: Locale, index: usize, whole: u128, fraction: Option<u128>) -> String {
    let number = match fraction {
        Some(f) if f != 0 => match locale {
            Locale::EnUs => format!("{}.{}", whole, f),
            Locale::PtBr => format!("{},{}", whole, f),
        },
        _ => whole.to_string(),
    };

    match locale {
        Locale::EnUs => format!("{}{}", number, suffix(locale, index)),
        Locale::PtBr => format!("{}\u{a0}{}", number, suffix(locale, index)),
    }
}
