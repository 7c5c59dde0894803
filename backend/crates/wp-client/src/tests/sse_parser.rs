use crate::{SseFrame, SseParser};

#[test]
fn given_complete_frame_when_pushed_then_dispatched() {
    let mut parser = SseParser::new();

    let frames = parser.push(b"event: envelope\nid: 17\ndata: {\"a\":1}\n\n");

    assert_eq!(
        frames,
        vec![SseFrame {
            event: Some("envelope".to_string()),
            data: "{\"a\":1}".to_string(),
            id: Some("17".to_string()),
        }]
    );
}

#[test]
fn given_frame_split_across_chunks_when_pushed_then_dispatched_once_complete() {
    let mut parser = SseParser::new();

    assert!(parser.push(b"event: env").is_empty());
    assert!(parser.push(b"elope\r\ndata: hel").is_empty());
    let frames = parser.push(b"lo\r\n\r\n");

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event_name(), "envelope");
    assert_eq!(frames[0].data, "hello");
}

#[test]
fn given_multiline_data_when_pushed_then_joined_with_newline() {
    let mut parser = SseParser::new();

    let frames = parser.push(b"data: first\ndata: second\n\n");

    assert_eq!(frames[0].data, "first\nsecond");
    assert_eq!(frames[0].event_name(), "message");
}

#[test]
fn given_keep_alive_comment_when_pushed_then_no_frame() {
    let mut parser = SseParser::new();

    let frames = parser.push(b": keep-alive\n\n");

    assert!(frames.is_empty());
}

#[test]
fn given_multibyte_character_split_across_chunks_when_pushed_then_preserved() {
    let mut parser = SseParser::new();
    let text = "data: café\n\n".as_bytes();
    let split = text.iter().position(|b| *b == 0xC3).unwrap() + 1;

    assert!(parser.push(&text[..split]).is_empty());
    let frames = parser.push(&text[split..]);

    assert_eq!(frames[0].data, "café");
}
