//! Text normalization shared by every matching step of the categorizer.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Reduce `text` to a canonical token string.
///
/// Accents are stripped by decomposing the text (NFD) and dropping the
/// combining marks, the text is lowercased, every character outside
/// `[a-z0-9 ]` becomes a space and whitespace runs are collapsed into a single
/// space with no leading or trailing whitespace.
///
/// The function is total and idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => ' ',
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split an already normalized string into its tokens.
#[inline]
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|token| !token.is_empty())
}

#[cfg(test)]
mod normalize_tests {
    use super::{normalize, tokens};

    #[test]
    fn strips_accents_symbols_and_case() {
        assert_eq!(normalize("Café Jumbo #123"), "cafe jumbo 123");
        assert_eq!(normalize("EDUCACIÓN Pública"), "educacion publica");
        assert_eq!(normalize("Peñalolén"), "penalolen");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(normalize("  uber\t\tal   aeropuerto \n"), "uber al aeropuerto");
        assert_eq!(normalize("pago--luz//agua"), "pago luz agua");
    }

    #[test]
    fn empty_and_symbol_only_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("#$%&*!"), "");
    }

    #[test]
    fn non_latin_characters_become_separators() {
        assert_eq!(normalize("pago東京tienda"), "pago tienda");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "Café Jumbo #123",
            "  ÑANDÚ  Grill & Bar ",
            "Straße",
            "İstanbul kebab",
            "",
            "ÁÉÍÓÚ áéíóú üÜ",
            "Netflix.com*Suscripción",
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "normalize is not idempotent for {input:?}");
        }
    }

    #[test]
    fn tokens_skip_empty_segments() {
        let got: Vec<_> = tokens("compra en jumbo").collect();
        assert_eq!(got, vec!["compra", "en", "jumbo"]);
        assert_eq!(tokens("").count(), 0);
    }
}
