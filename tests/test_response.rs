use hearth::http::response::{Response, ResponseBuilder, StatusCode};
use hearth::http::writer::{serialize_response, ResponseSink, ResponseWriter};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::PayloadTooLarge.as_u16(), 413);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(StatusCode::PayloadTooLarge.reason_phrase(), "Payload Too Large");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.header("x-custom"), Some("value"));
    assert_eq!(response.header("Content-Length"), Some("4"));
}

#[test]
fn test_response_builder_replaces_header_in_place() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "one")
        .header("content-type", "text/html")
        .build();

    assert_eq!(response.headers.len(), 3);
    assert_eq!(response.headers[0].1, "text/html");
}

#[test]
fn test_response_content_length_always_matches_body() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"abc".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), Some("3"));
}

#[test]
fn test_not_found_framing_is_exact() {
    let bytes = serialize_response(&Response::not_found());

    assert_eq!(
        bytes,
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec()
    );
}

#[test]
fn test_static_content_framing() {
    let bytes = serialize_response(&Response::content("text/html", b"<p>hi</p>".to_vec()));

    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 9\r\n\r\n<p>hi</p>"
    );
}

#[test]
fn test_internal_error_has_empty_body() {
    let response = Response::internal_error();

    assert_eq!(response.status, StatusCode::InternalServerError);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Connection"), Some("close"));
}

#[test]
fn test_response_sink_collects_writes() {
    use std::io::Write;

    let mut sink = ResponseSink::new();
    assert!(sink.is_empty());

    sink.write_all(b"HTTP/1.1 200 OK\r\n").unwrap();
    sink.write_all(b"Content-Length: 0\r\n\r\n").unwrap();

    assert_eq!(
        sink.into_bytes(),
        b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n".to_vec()
    );
}

#[test]
fn test_response_sink_send_serializes() {
    let mut sink = ResponseSink::new();
    sink.send(&Response::ok("x"));

    assert_eq!(sink.into_bytes(), serialize_response(&Response::ok("x")));
}

#[tokio::test]
async fn test_response_writer_writes_everything() {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = ResponseWriter::new(&Response::ok("hello"));

    writer.write_to_stream(&mut out).await.unwrap();

    assert!(out.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(out.ends_with(b"\r\n\r\nhello"));
}
