mod test_utils;

use danetrans::url::{UrlInfo, UrlResolver, UrlScheme};
use danetrans::TransResult;
use log::*;

#[test]
fn test_040_url() -> TransResult<()> {
    let mut _log_handle = test_utils::init_logger();
    full_form()?;
    duplicate_query_keys_are_preserved()?;
    unknown_scheme_has_port_zero()?;
    build_then_parse_is_identity()?;
    info!("url tests passed");
    Ok(())
}

fn full_form() -> TransResult<()> {
    let info = UrlResolver::parse("danejoe://files.local:9099/pull/file?task=7")?;
    assert_eq!(info.scheme, UrlScheme::Danejoe);
    assert_eq!(info.host, "files.local");
    assert_eq!(info.port, 9099);
    assert_eq!(info.path, "/pull/file");
    assert_eq!(info.get_param("task"), Some("7"));
    assert_eq!(info.get_param("missing"), None);
    assert_eq!(info.addr(), "files.local:9099");
    Ok(())
}

fn duplicate_query_keys_are_preserved() -> TransResult<()> {
    let info = UrlResolver::parse("danejoe://h/x?k=1&k=2&other=3")?;
    let values: Vec<&str> = info
        .query
        .iter()
        .filter(|(k, _)| k == "k")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(values, vec!["1", "2"]);
    // get_param returns any one of them
    assert!(matches!(info.get_param("k"), Some("1") | Some("2")));
    Ok(())
}

fn unknown_scheme_has_port_zero() -> TransResult<()> {
    let info = UrlResolver::parse("gopher://files.local/x")?;
    assert_eq!(info.scheme, UrlScheme::Unknown);
    assert_eq!(info.port, 0);
    assert_eq!(UrlScheme::Unknown.default_port(), 0);
    Ok(())
}

fn build_then_parse_is_identity() -> TransResult<()> {
    let info = UrlInfo {
        scheme: UrlScheme::Danejoe,
        host: "files.local".to_string(),
        port: 9099,
        path: "/pull".to_string(),
        query: vec![
            ("task".to_string(), "7".to_string()),
            ("task".to_string(), "9".to_string()),
        ],
    };
    let url = UrlResolver::build(&info);
    assert_eq!(url, "danejoe://files.local:9099/pull?task=7&task=9");
    assert_eq!(UrlResolver::parse(&url)?, info);
    Ok(())
}
