use crate::network::tests::mocks::MockFrames;
use crate::subscription::events::{DecodeError, PushEvent, ToPushEvent};
use crate::subscription::session::{Ack, Kind};
use alloc::vec;
use bytes::Bytes;
use redis_protocol::resp2::types::Frame as Resp2Frame;
use redis_protocol::resp3::types::Frame as Resp3Frame;

fn push(data: vec::Vec<Resp3Frame>) -> Resp3Frame {
    Resp3Frame::Push { data, attributes: None }
}

#[test]
fn test_decode_subscribe_confirmation_resp3() {
    let event = push(MockFrames::ack_resp3("subscribe", "news", 1)).decode_push().unwrap();

    assert_eq!(
        PushEvent::Subscribed {
            name: Bytes::from_static(b"news"),
            total: 1
        },
        event
    );
}

#[test]
fn test_decode_punsubscribe_confirmation_resp2() {
    let event = Resp2Frame::Array(MockFrames::ack_resp2("punsubscribe", "news.*", 0))
        .decode_push()
        .unwrap();

    assert_eq!(
        PushEvent::PUnsubscribed {
            pattern: Bytes::from_static(b"news.*"),
            total: 0
        },
        event
    );
}

#[test]
fn test_decode_message_resp2() {
    let event = Resp2Frame::Array(vec![
        MockFrames::bulk_resp2("message"),
        MockFrames::bulk_resp2("news"),
        MockFrames::bulk_resp2("hello"),
    ])
    .decode_push()
    .unwrap();

    assert_eq!(
        PushEvent::Message {
            channel: Bytes::from_static(b"news"),
            payload: Bytes::from_static(b"hello")
        },
        event
    );
}

#[test]
fn test_decode_pmessage_resp3() {
    let event = push(vec![
        MockFrames::blob_resp3("pmessage"),
        MockFrames::blob_resp3("news.*"),
        MockFrames::blob_resp3("news.sport"),
        MockFrames::blob_resp3("goal"),
    ])
    .decode_push()
    .unwrap();

    assert_eq!(
        PushEvent::PMessage {
            pattern: Bytes::from_static(b"news.*"),
            channel: Bytes::from_static(b"news.sport"),
            payload: Bytes::from_static(b"goal")
        },
        event
    );
}

#[test]
fn test_decode_nil_name() {
    let event = push(vec![
        MockFrames::blob_resp3("unsubscribe"),
        Resp3Frame::Null,
        MockFrames::number_resp3(0),
    ])
    .decode_push()
    .unwrap();

    assert_eq!(
        PushEvent::Unsubscribed {
            name: Bytes::new(),
            total: 0
        },
        event
    );
}

#[test]
fn test_decode_unknown_kind_ignored() {
    let pong = push(vec![MockFrames::blob_resp3("pong"), MockFrames::blob_resp3("")]);
    assert_eq!(PushEvent::Unknown, pong.decode_push().unwrap());
}

#[test]
fn test_decode_non_push_frames_ignored() {
    assert_eq!(PushEvent::Unknown, MockFrames::ok_resp3().decode_push().unwrap());
    assert_eq!(PushEvent::Unknown, MockFrames::ok_resp2().decode_push().unwrap());

    // RESP3 arrays are regular replies, not push messages
    let array = Resp3Frame::Array {
        data: MockFrames::ack_resp3("subscribe", "news", 1),
        attributes: None,
    };
    assert_eq!(PushEvent::Unknown, array.decode_push().unwrap());

    // Non-string type element
    let integers = Resp2Frame::Array(vec![Resp2Frame::Integer(1), Resp2Frame::Integer(2)]);
    assert_eq!(PushEvent::Unknown, integers.decode_push().unwrap());
}

#[test]
fn test_decode_missing_count() {
    let frame = push(vec![MockFrames::blob_resp3("subscribe"), MockFrames::blob_resp3("news")]);
    assert_eq!(DecodeError::ProtocolViolation, frame.decode_push().unwrap_err());
}

#[test]
fn test_decode_missing_pmessage_payload() {
    let frame = push(vec![
        MockFrames::blob_resp3("pmessage"),
        MockFrames::blob_resp3("news.*"),
        MockFrames::blob_resp3("news.sport"),
    ]);
    assert_eq!(DecodeError::ProtocolViolation, frame.decode_push().unwrap_err());
}

#[test]
fn test_decode_count_not_integer() {
    let frame = Resp2Frame::Array(vec![
        MockFrames::bulk_resp2("subscribe"),
        MockFrames::bulk_resp2("news"),
        MockFrames::bulk_resp2("1"),
    ]);
    assert_eq!(DecodeError::ProtocolViolation, frame.decode_push().unwrap_err());
}

#[test]
fn test_decode_negative_count() {
    let frame = push(MockFrames::ack_resp3("subscribe", "news", -1));
    assert_eq!(DecodeError::ProtocolViolation, frame.decode_push().unwrap_err());
}

#[test]
fn test_into_ack() {
    let event = PushEvent::PSubscribed {
        pattern: Bytes::from_static(b"news.*"),
        total: 2,
    };
    assert_eq!(
        (Kind::Pattern, Ack::Subscribe, Bytes::from_static(b"news.*"), 2),
        event.into_ack().unwrap()
    );

    let message = PushEvent::Message {
        channel: Bytes::from_static(b"news"),
        payload: Bytes::new(),
    };
    assert_eq!(message.clone(), message.into_ack().unwrap_err());
}
