//! Utilidades de validación
//!
//! Este módulo contiene las validaciones de campo que usan todos los
//! formularios de entidades: longitudes de nombre, rangos numéricos,
//! identificadores con formato, matrículas y fechas de calendario.
//! Todas las funciones son puras y trabajan sobre el texto crudo del campo.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

lazy_static! {
    static ref DATE_YMD: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// Quitar espacios al inicio y al final
pub fn trim(value: &str) -> &str {
    value.trim()
}

/// Entero sin signo: sólo dígitos, ignorando espacios intermedios
pub fn is_integer(value: &str) -> bool {
    let mut seen_digit = false;
    for c in value.chars() {
        if c.is_ascii_digit() {
            seen_digit = true;
        } else if !c.is_whitespace() {
            return false;
        }
    }
    seen_digit
}

/// Número decimal: signo opcional, dígitos y como mucho un punto
pub fn is_decimal(value: &str) -> bool {
    let body = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);

    if body.is_empty() {
        return false;
    }

    let mut seen_point = false;
    for c in body.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    true
}

/// Proyección que conserva sólo los dígitos decimales
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Convertir un entero validado con `is_integer`
///
/// Los espacios intermedios se descartan; un valor que no cabe en `i64`
/// se trata como inválido.
pub fn parse_integer(value: &str) -> Option<i64> {
    if !is_integer(value) {
        return None;
    }
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact.parse().ok()
}

/// Convertir un decimal validado con `is_decimal`
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    if !is_decimal(value) || !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let (negative, body) = match value.as_bytes()[0] {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };

    // "5." y ".5" son válidos para is_decimal pero no para Decimal::from_str_exact
    let mut normalized = String::with_capacity(body.len() + 2);
    if body.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(body);
    if body.ends_with('.') {
        normalized.push('0');
    }

    // Más decimales de los representables se rechaza en lugar de redondear
    let parsed = Decimal::from_str_exact(&normalized).ok()?;
    Some(if negative { -parsed } else { parsed })
}

/// Convertir una fecha `YYYY-MM-DD` con calendario gregoriano proléptico
pub fn parse_date_ymd(value: &str) -> Option<NaiveDate> {
    if !DATE_YMD.is_match(value) {
        return None;
    }

    let year: i32 = value[0..4].parse().ok()?;
    let month: u32 = value[5..7].parse().ok()?;
    let day: u32 = value[8..10].parse().ok()?;

    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Nombre de 2 a 100 caracteres
pub fn valid_name(value: &str) -> bool {
    let len = trim(value).chars().count();
    (2..=100).contains(&len)
}

/// Texto obligatorio de hasta `max` caracteres
pub fn valid_text(value: &str, max: usize) -> bool {
    let len = trim(value).chars().count();
    len >= 1 && len <= max
}

/// Licencia de conducir: exactamente 11 dígitos
pub fn valid_license_number(value: &str) -> bool {
    digits_only(value).len() == 11
}

/// Salario en [0, 1e9)
pub fn valid_salary(value: &str) -> bool {
    parse_decimal(value)
        .map(|v| v >= Decimal::ZERO && v < Decimal::from(1_000_000_000u64))
        .unwrap_or(false)
}

/// Matrícula: 7 caracteres alfanuméricos, sin espacios ni distinción de mayúsculas
pub fn valid_plate(value: &str) -> bool {
    let compact: Vec<char> = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    compact.len() == 7 && compact.iter().all(|c| c.is_ascii_alphanumeric())
}

/// Año entre 1900 y 2100
pub fn valid_year(value: &str) -> bool {
    parse_integer(value)
        .map(|y| (1900..=2100).contains(&y))
        .unwrap_or(false)
}

/// Kilometraje entre 0 y 1.000.000.000
pub fn valid_odometer(value: &str) -> bool {
    parse_integer(value)
        .map(|km| (0..=1_000_000_000).contains(&km))
        .unwrap_or(false)
}

/// Identificador fiscal: 11 dígitos (persona) o 14 (empresa)
pub fn valid_tax_id(value: &str) -> bool {
    let digits = digits_only(value);
    digits.len() == 11 || digits.len() == 14
}

/// Fecha `YYYY-MM-DD` existente en el calendario
pub fn valid_date_ymd(value: &str) -> bool {
    parse_date_ymd(value).is_some()
}

/// Número estrictamente positivo
pub fn valid_positive_number(value: &str) -> bool {
    parse_decimal(value)
        .map(|v| v > Decimal::ZERO)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_is_integer() {
        assert!(is_integer("42"));
        assert!(is_integer(" 4 2 "));
        assert!(!is_integer(""));
        assert!(!is_integer("   "));
        assert!(!is_integer("-1"));
        assert!(!is_integer("abc"));
        assert!(!is_integer("1.5"));
    }

    #[test]
    fn test_parse_integer_overflow_is_invalid() {
        assert_eq!(parse_integer("12 34"), Some(1234));
        assert_eq!(parse_integer("99999999999999999999999"), None);
    }

    #[test]
    fn test_is_decimal() {
        assert!(is_decimal("10"));
        assert!(is_decimal("-10.5"));
        assert!(is_decimal("+0.25"));
        assert!(is_decimal("5."));
        assert!(!is_decimal("-"));
        assert!(!is_decimal(""));
        assert!(!is_decimal("1.2.3"));
        assert!(!is_decimal("1,5"));
    }

    #[test]
    fn test_parse_decimal_edge_forms() {
        assert_eq!(parse_decimal("5."), Some(Decimal::from(5)));
        assert_eq!(parse_decimal(".5"), Decimal::from_str("0.5").ok());
        assert_eq!(parse_decimal("-2"), Some(Decimal::from(-2)));
        assert_eq!(parse_decimal("."), None);
    }

    #[test]
    fn test_parse_decimal_rejects_unrepresentable_precision() {
        assert_eq!(parse_decimal("1.00000000000000000000000000000001"), None);
        assert!(!valid_positive_number("0.00000000000000000000000000000001"));
        assert_eq!(
            parse_decimal("0.0000000000000000000000000001"),
            Decimal::from_str("0.0000000000000000000000000001").ok()
        );
        assert!(valid_positive_number("0.0000000000000000000000000001"));
    }

    #[test]
    fn test_valid_date_ymd_leap_years() {
        assert!(valid_date_ymd("2024-02-29"));
        assert!(!valid_date_ymd("2023-02-29"));
        assert!(valid_date_ymd("2023-02-28"));
        assert!(valid_date_ymd("2000-02-29"));
        assert!(!valid_date_ymd("1900-02-29"));
    }

    #[test]
    fn test_valid_date_ymd_rejects_non_ascii_digits() {
        assert!(!valid_date_ymd("2024-\u{FF10}\u{FF11}-01"));
        assert!(!valid_date_ymd("\u{0662}\u{0660}\u{0662}\u{0664}-01-01"));
        assert_eq!(parse_date_ymd("2024-０１-01"), None);
    }

    #[test]
    fn test_valid_date_ymd_format() {
        assert!(!valid_date_ymd("2024-2-01"));
        assert!(!valid_date_ymd("2024/02/01"));
        assert!(!valid_date_ymd("2024-13-01"));
        assert!(!valid_date_ymd("2024-04-31"));
        assert!(!valid_date_ymd("2024-01-00"));
        assert!(valid_date_ymd("2024-12-31"));
    }

    #[test]
    fn test_valid_plate() {
        assert!(valid_plate("abc1234"));
        assert!(valid_plate("ABC 1D23"));
        assert!(!valid_plate("AB-1234"));
        assert!(!valid_plate("ABC123"));
    }

    #[test]
    fn test_valid_license_number() {
        assert!(valid_license_number("123.456.789-01"));
        assert!(!valid_license_number("1234567890"));
    }

    #[test]
    fn test_valid_tax_id() {
        assert!(valid_tax_id("123.456.789-01"));
        assert!(valid_tax_id("12.345.678/0001-90"));
        assert!(!valid_tax_id("1234567890123"));
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(valid_salary("0"));
        assert!(valid_salary("999999999.99"));
        assert!(!valid_salary("1000000000"));
        assert!(!valid_salary("-1"));

        assert!(valid_year("1900"));
        assert!(valid_year("2100"));
        assert!(!valid_year("1899"));

        assert!(valid_odometer("0"));
        assert!(valid_odometer("1000000000"));
        assert!(!valid_odometer("1000000001"));

        assert!(valid_positive_number("0.01"));
        assert!(!valid_positive_number("0"));
        assert!(!valid_positive_number("-3"));
    }

    #[test]
    fn test_name_and_text_lengths() {
        assert!(valid_name("  Al  "));
        assert!(!valid_name(" A "));
        assert!(!valid_name(&"x".repeat(101)));
        assert!(valid_text("x", 10));
        assert!(!valid_text("   ", 10));
        assert!(!valid_text(&"y".repeat(11), 10));
    }
}
