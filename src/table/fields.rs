//! Cell-level text helpers shared by readers and converters

/// Replace accented Latin letters with their base letter
fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Normalize a header for lookup: no accents, lowercase, no spaces or slashes.
///
/// `DESCRIÇÃO` -> `descricao`, `Tipo MP` -> `tipomp`, `Cód/Ref` -> `codref`.
pub fn normalize_header(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .map(strip_accent)
        .filter(|c| !c.is_whitespace() && *c != '/')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Make free text safe for a `;`-separated record.
///
/// Line breaks and tabs become spaces, `;` becomes `,`, runs of spaces
/// collapse to one and the result is trimmed.
pub fn sanitize_field(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| match c {
            '\r' | '\n' | '\t' => ' ',
            ';' => ',',
            other => other,
        })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    let mut previous_space = false;
    for c in replaced.chars() {
        if c == ' ' {
            if !previous_space {
                collapsed.push(c);
            }
            previous_space = true;
        } else {
            collapsed.push(c);
            previous_space = false;
        }
    }
    collapsed.trim().to_string()
}

/// Parse a numeric cell written with either decimal separator
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '\u{a0}' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Two decimals with a decimal comma (`0.5` -> `0,50`)
pub fn format_decimal_comma(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("DESCRIÇÃO"), "descricao");
        assert_eq!(normalize_header(" Peso "), "peso");
        assert_eq!(normalize_header("Tipo MP"), "tipomp");
        assert_eq!(normalize_header("Cód/Ref"), "codref");
        assert_eq!(normalize_header("\u{feff}Codigo"), "codigo");
    }

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("  CHAPA;\r\nACO\t 1020  "), "CHAPA, ACO 1020");
        assert_eq!(sanitize_field("a    b"), "a b");
        assert_eq!(sanitize_field(""), "");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1,5"), Some(1.5));
        assert_eq!(parse_decimal("1\u{a0}234.5"), Some(1234.5));
        assert_eq!(parse_decimal(" "), None);
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_format_decimal_comma() {
        assert_eq!(format_decimal_comma(0.5), "0,50");
        assert_eq!(format_decimal_comma(12.346), "12,35");
    }
}
