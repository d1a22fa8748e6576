//! Municipality extraction from observation point addresses.

/// Administrative suffixes that end a municipality name.
const SUFFIXES: [char; 4] = ['市', '区', '町', '村'];

fn is_suffix(c: char) -> bool {
    SUFFIXES.contains(&c)
}

/// Reduce an address to its municipality: the leading run up to and
/// including the first administrative suffix that follows at least one
/// other character.
///
/// Returns `None` when the address has no such suffix. The result is a
/// fixed point: applying the function to its own output returns it
/// unchanged.
///
/// ```
/// use bulletin::municipality;
///
/// assert_eq!(municipality("札幌市中央区"), Some("札幌市"));
/// assert_eq!(municipality("市川市八幡"), Some("市川市"));
/// assert_eq!(municipality("東京都"), None);
/// ```
pub fn municipality(address: &str) -> Option<&str> {
    let mut chars = address.char_indices();
    chars.next()?;
    chars
        .find(|(_, c)| is_suffix(*c))
        .map(|(idx, c)| &address[..idx + c.len_utf8()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_suffix_wins() {
        assert_eq!(municipality("札幌市中央区"), Some("札幌市"));
        assert_eq!(municipality("千代田区大手町"), Some("千代田区"));
        assert_eq!(municipality("志賀町香能"), Some("志賀町"));
        assert_eq!(municipality("檜枝岐村"), Some("檜枝岐村"));
    }

    #[test]
    fn test_leading_suffix_character_is_part_of_name() {
        assert_eq!(municipality("市川市"), Some("市川市"));
        assert_eq!(municipality("町田市原町田"), Some("町田市"));
    }

    #[test]
    fn test_no_suffix() {
        assert_eq!(municipality(""), None);
        assert_eq!(municipality("市"), None);
        assert_eq!(municipality("石川県"), None);
    }

    #[test]
    fn test_idempotent() {
        for addr in ["札幌市中央区", "市川市八幡", "余市町", "七尾市", "町田市原町田"] {
            let once = municipality(addr).unwrap();
            assert_eq!(municipality(once), Some(once), "address {}", addr);
        }
    }
}
