use hearth::http::parser::{parse_request_head, ParseError};
use hearth::http::request::Method;

const ALLOWED: &[Method] = &[Method::GET, Method::POST];

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let head = parse_request_head(req, ALLOWED).unwrap();

    assert_eq!(head.method, Method::GET);
    assert_eq!(head.path, "/index.html");
    assert_eq!(head.version, "HTTP/1.1");
    assert_eq!(head.query, None);
    assert_eq!(head.headers.get("Host"), Some("example.com"));
    assert_eq!(head.body_offset, Some(req.len()));
    assert_eq!(head.content_length, 0);
}

#[test]
fn test_parse_post_request_with_body_offset() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let head = parse_request_head(req, ALLOWED).unwrap();

    assert_eq!(head.method, Method::POST);
    assert_eq!(head.content_length, 5);
    let offset = head.body_offset.unwrap();
    assert_eq!(&req[offset..], b"hello");
}

#[test]
fn test_parse_splits_query_at_first_question_mark() {
    let req = b"GET /search?q=rust&x=a?b HTTP/1.1\r\n\r\n";
    let head = parse_request_head(req, ALLOWED).unwrap();

    assert_eq!(head.path, "/search");
    assert_eq!(head.query.as_deref(), Some("q=rust&x=a?b"));
}

#[test]
fn test_parse_keeps_duplicate_headers_in_order() {
    let req = b"GET / HTTP/1.1\r\nAccept: a\r\nX-Trace: 1\r\naccept: b\r\n\r\n";
    let head = parse_request_head(req, ALLOWED).unwrap();

    let accepts: Vec<&str> = head.headers.get_all("Accept").collect();
    assert_eq!(accepts, vec!["a", "b"]);
    assert_eq!(
        head.headers.lines(),
        vec!["Accept: a", "X-Trace: 1", "accept: b"]
    );
}

#[test]
fn test_parse_missing_blank_line_means_no_headers() {
    let req = b"GET /file.txt HTTP/1.1\r\nHost: example.com\r\n";
    let head = parse_request_head(req, ALLOWED).unwrap();

    assert!(head.headers.is_empty());
    assert_eq!(head.body_offset, None);
    assert_eq!(head.content_length, 0);
}

#[test]
fn test_parse_missing_request_line_terminator() {
    let result = parse_request_head(b"GET / HTTP/1.1", ALLOWED);
    assert_eq!(result, Err(ParseError::MissingRequestLine));
}

#[test]
fn test_parse_request_line_needs_three_tokens() {
    for line in [
        "GET /\r\n\r\n",
        "GET / HTTP/1.1 extra\r\n\r\n",
        "GET  / HTTP/1.1\r\n\r\n",
        "\r\n\r\n",
    ] {
        let result = parse_request_head(line.as_bytes(), ALLOWED);
        assert_eq!(result, Err(ParseError::InvalidRequestLine), "line {:?}", line);
    }
}

#[test]
fn test_parse_rejects_methods_outside_allow_list() {
    let result = parse_request_head(b"PUT /x HTTP/1.1\r\n\r\n", ALLOWED);
    assert_eq!(result, Err(ParseError::MethodNotAllowed("PUT".to_string())));

    let result = parse_request_head(b"BREW /pot HTTP/1.1\r\n\r\n", ALLOWED);
    assert_eq!(result, Err(ParseError::MethodNotAllowed("BREW".to_string())));

    let head = parse_request_head(b"PUT /x HTTP/1.1\r\n\r\n", &[Method::PUT]).unwrap();
    assert_eq!(head.method, Method::PUT);
}

#[test]
fn test_parse_rejects_empty_path() {
    let result = parse_request_head(b"GET ?a=1 HTTP/1.1\r\n\r\n", ALLOWED);
    assert_eq!(result, Err(ParseError::EmptyPath));
}

#[test]
fn test_parse_skips_header_without_colon() {
    let req = b"GET / HTTP/1.1\r\nHost: x\r\nBrokenHeader\r\n: nameless\r\nAccept: */*\r\n\r\n";
    let head = parse_request_head(req, ALLOWED).unwrap();

    assert_eq!(head.headers.len(), 2);
    assert_eq!(head.headers.get("Host"), Some("x"));
    assert_eq!(head.headers.get("Accept"), Some("*/*"));
    assert_eq!(head.body_offset, Some(req.len()));
}

#[test]
fn test_parse_rejects_non_utf8_header_block() {
    let result = parse_request_head(b"GET / HTTP/1.1\r\nX-Bin: \xff\xfe\r\n\r\n", ALLOWED);
    assert_eq!(result, Err(ParseError::InvalidHeader));
}

#[test]
fn test_parse_unparseable_content_length_is_zero() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: ten\r\n\r\nhello";
    let head = parse_request_head(req, ALLOWED).unwrap();
    assert_eq!(head.content_length, 0);

    let req = b"POST /api HTTP/1.1\r\ncontent-length:  7 \r\n\r\n";
    let head = parse_request_head(req, ALLOWED).unwrap();
    assert_eq!(head.content_length, 7);
}
