// Referring-domain extraction.
//
// Backlink exports give us full page URLs. Disavow files work on domains, so
// everything gets reduced to a lowercase host with any leading "www." removed.
// Internationalized hosts are kept in Unicode form on every path, so a URL
// host (which the parser punycodes) and a hand-written disavow entry agree.
// Bad URLs never raise: they collapse to an empty string.

use url::{quirks, Url};

const ACE_PREFIX: &str = "xn--";

/// Extract the referring domain from a page URL.
///
/// Returns an empty string for anything that doesn't parse as an absolute URL
/// with a host (bare hostnames, "nan", mailto links, garbage).
pub fn extract_domain(raw_url: &str) -> String {
    let parsed = match Url::parse(raw_url.trim()) {
        Ok(u) => u,
        Err(_) => return String::new(),
    };

    match parsed.host_str() {
        Some(host) => strip_www(&to_unicode(&host.to_lowercase())).to_string(),
        None => String::new(),
    }
}

/// Normalize a domain string that came from a disavow line or a review sheet:
/// trim, lowercase, strip a leading "www.".
pub fn normalize_domain(raw: &str) -> String {
    strip_www(&to_unicode(&raw.trim().to_lowercase())).to_string()
}

/// Decode punycode labels. Hosts that aren't IDNs, or don't decode, pass through.
fn to_unicode(host: &str) -> String {
    if !host.split('.').any(|label| label.starts_with(ACE_PREFIX)) {
        return host.to_string();
    }
    let unicode = quirks::domain_to_unicode(host);
    if unicode.is_empty() {
        host.to_string()
    } else {
        unicode
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_path_and_www() {
        assert_eq!(extract_domain("http://www.example.com/x"), "example.com");
        assert_eq!(extract_domain("https://example.com/y"), "example.com");
    }

    #[test]
    fn lowercases_host() {
        assert_eq!(
            extract_domain("https://WWW.Spammy-SEO.biz/Page?q=1"),
            "spammy-seo.biz"
        );
    }

    #[test]
    fn drops_port_and_credentials() {
        assert_eq!(
            extract_domain("http://user:pw@www.example.org:8080/a"),
            "example.org"
        );
    }

    #[test]
    fn only_leading_www_is_removed() {
        assert_eq!(extract_domain("http://blog.www.example.com/"), "blog.www.example.com");
        assert_eq!(extract_domain("http://wwwexample.com/"), "wwwexample.com");
    }

    #[test]
    fn unparseable_input_yields_empty() {
        assert_eq!(extract_domain("nan"), "");
        assert_eq!(extract_domain(""), "");
        assert_eq!(extract_domain("example.com/no-scheme"), "");
        assert_eq!(extract_domain("mailto:someone@example.com"), "");
    }

    #[test]
    fn idn_hosts_come_out_in_unicode() {
        assert_eq!(extract_domain("http://www.bücher-spam.de/p"), "bücher-spam.de");
        assert_eq!(extract_domain("http://xn--bcher-spam-9db.de/"), "bücher-spam.de");
        assert_eq!(normalize_domain("xn--bcher-spam-9db.de"), "bücher-spam.de");
        assert_eq!(normalize_domain("Bücher-Spam.de"), "bücher-spam.de");
    }

    #[test]
    fn normalize_domain_trims_and_strips() {
        assert_eq!(normalize_domain("  WWW.Example.COM "), "example.com");
        assert_eq!(normalize_domain("sub.example.com"), "sub.example.com");
        assert_eq!(normalize_domain(""), "");
    }
}
