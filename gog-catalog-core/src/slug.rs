/// Turn a display name into a lower-case, hyphenated, identifier-safe slug.
///
/// ASCII letters and digits are kept, common Latin accented letters are
/// folded to their base letter, `&` becomes `and`, and every other run of
/// characters collapses into a single `-`. Leading and trailing separators
/// are dropped, so `"  Paradox  Interactive! "` becomes `"paradox-interactive"`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        let piece: Option<&str> = match c {
            '&' => Some("and"),
            _ => fold_accent(c),
        };

        if let Some(piece) = piece {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push_str(piece);
            continue;
        }

        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Slug for a game record: the storefront slug with underscores replaced by hyphens.
///
/// No other normalization is applied; the storefront already emits lower-case slugs.
pub fn game_slug(store_slug: &str) -> String {
    store_slug.replace('_', "-")
}

fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'œ' | 'Œ' => "oe",
        'ß' => "ss",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ł' | 'Ł' => "l",
        'ś' | 'Ś' | 'š' | 'Š' => "s",
        'ź' | 'ż' | 'ž' | 'Ź' | 'Ż' | 'Ž' => "z",
        'ć' | 'č' | 'Ć' | 'Č' => "c",
        'ę' | 'ě' | 'Ę' | 'Ě' => "e",
        'ą' | 'Ą' => "a",
        'ń' | 'Ń' => "n",
        'ř' | 'Ř' => "r",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("CD PROJEKT RED"), "cd-projekt-red");
        assert_eq!(slugify("Role-playing"), "role-playing");
        assert_eq!(slugify("Windows"), "windows");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Paradox  Interactive! "), "paradox-interactive");
        assert_eq!(slugify("Point-and-click / Adventure"), "point-and-click-adventure");
        assert_eq!(slugify("Devolver Digital, Inc."), "devolver-digital-inc");
    }

    #[test]
    fn test_slugify_folds_accents_and_ampersand() {
        assert_eq!(slugify("Würth & Söhne"), "wurth-and-sohne");
        assert_eq!(slugify("Techland Łódź"), "techland-lodz");
    }

    #[test]
    fn test_slugify_drops_unmappable() {
        assert_eq!(slugify("日本 Falcom"), "falcom");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_game_slug() {
        assert_eq!(game_slug("the_witcher_3_wild_hunt"), "the-witcher-3-wild-hunt");
        assert_eq!(game_slug("cyberpunk-2077"), "cyberpunk-2077");
    }
}
