//! `$DWGCODEPAGE` to encoding mapping.

use encoding_rs::Encoding;

/// Fallback encoding for the strings of a file with the given code page.
///
/// `None` means the strings are already UTF-8 or plain ASCII. Names are
/// matched case-insensitively; unrecognized names fall back to
/// Windows-1252, the most common code page in practice.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let encoding = match code_page.trim().to_ascii_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "unicode" => return None,

        "gb2312" | "ansi_936" => encoding_rs::GBK,
        "big5" | "ansi_950" => encoding_rs::BIG5,
        "korean" | "ansi_949" | "johab" => encoding_rs::EUC_KR,
        "ansi_932" => encoding_rs::SHIFT_JIS,

        "dos437" | "dos855" | "dos866" => encoding_rs::IBM866,
        "dos852" => encoding_rs::WINDOWS_1250,
        "dos857" => encoding_rs::WINDOWS_1254,
        "dos869" => encoding_rs::WINDOWS_1253,

        "ansi_874" => encoding_rs::WINDOWS_874,
        "ansi_1250" => encoding_rs::WINDOWS_1250,
        "ansi_1251" => encoding_rs::WINDOWS_1251,
        "ansi_1253" => encoding_rs::WINDOWS_1253,
        "ansi_1254" | "iso8859-9" => encoding_rs::WINDOWS_1254,
        "ansi_1255" => encoding_rs::WINDOWS_1255,
        "ansi_1256" => encoding_rs::WINDOWS_1256,
        "ansi_1257" => encoding_rs::WINDOWS_1257,
        "ansi_1258" => encoding_rs::WINDOWS_1258,

        "iso8859-2" => encoding_rs::ISO_8859_2,
        "iso8859-3" => encoding_rs::ISO_8859_3,
        "iso8859-4" => encoding_rs::ISO_8859_4,
        "iso8859-5" => encoding_rs::ISO_8859_5,
        "iso8859-6" => encoding_rs::ISO_8859_6,
        "iso8859-7" => encoding_rs::ISO_8859_7,
        "iso8859-8" => encoding_rs::ISO_8859_8,
        "iso8859-10" => encoding_rs::ISO_8859_10,
        "iso8859-13" => encoding_rs::ISO_8859_13,
        "iso8859-14" => encoding_rs::ISO_8859_14,
        "iso8859-15" => encoding_rs::ISO_8859_15,

        "koi8-r" => encoding_rs::KOI8_R,
        "koi8-u" => encoding_rs::KOI8_U,

        // ansi_1252, iso8859-1 and the western dos pages
        _ => encoding_rs::WINDOWS_1252,
    };
    Some(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(
            encoding_from_code_page("ANSI_1251"),
            Some(encoding_rs::WINDOWS_1251)
        );
        assert_eq!(
            encoding_from_code_page("ansi_1251"),
            encoding_from_code_page("Ansi_1251")
        );
    }

    #[test]
    fn test_unicode_pages_need_no_fallback() {
        assert_eq!(encoding_from_code_page("UTF-8"), None);
        assert_eq!(encoding_from_code_page("ascii"), None);
    }

    #[test]
    fn test_unknown_page_falls_back_to_1252() {
        assert_eq!(
            encoding_from_code_page("dos850"),
            Some(encoding_rs::WINDOWS_1252)
        );
        assert_eq!(
            encoding_from_code_page("SOMETHING_ELSE"),
            Some(encoding_rs::WINDOWS_1252)
        );
        assert_eq!(encoding_from_code_page("ANSI_932"), Some(encoding_rs::SHIFT_JIS));
    }
}
