use crate::commands::builder::{CommandBuilder, ToInteger, ToStringBytes};
use alloc::vec;
use bytes::Bytes;
use redis_protocol::resp2::types::Frame as Resp2Frame;
use redis_protocol::resp3::types::Frame as Resp3Frame;

#[test]
fn test_args_appended_in_order() {
    let channels = vec![Bytes::from_static(b"news"), Bytes::from_static(b"weather")];
    let frame: Resp2Frame = CommandBuilder::new("SUBSCRIBE").args(&channels).into();

    assert_eq!(
        Resp2Frame::Array(vec![
            Resp2Frame::BulkString(Bytes::from_static(b"SUBSCRIBE")),
            Resp2Frame::BulkString(Bytes::from_static(b"news")),
            Resp2Frame::BulkString(Bytes::from_static(b"weather")),
        ]),
        frame
    );
}

#[test]
fn test_args_empty_bare_command() {
    let frame: Resp3Frame = CommandBuilder::new("UNSUBSCRIBE").args(&vec![]).into();

    if let Resp3Frame::Array { data, attributes: _ } = frame {
        assert_eq!(1, data.len());
        assert_eq!("UNSUBSCRIBE", data[0].to_string().unwrap());
    } else {
        panic!("Array expected");
    }
}

#[test]
fn test_arg_option() {
    let pattern = Bytes::from_static(b"news.*");

    let with: Resp2Frame = CommandBuilder::new("PUBSUB")
        .arg_static("CHANNELS")
        .arg_option(Some(&pattern))
        .into();
    let without: Resp2Frame = CommandBuilder::new("PUBSUB").arg_static("CHANNELS").arg_option(None).into();

    match (with, without) {
        (Resp2Frame::Array(with), Resp2Frame::Array(without)) => {
            assert_eq!(3, with.len());
            assert_eq!("news.*", with[2].to_string().unwrap());
            assert_eq!(2, without.len());
        }
        _ => panic!("Arrays expected"),
    }
}

#[test]
fn test_to_integer() {
    assert_eq!(Some(5), Resp2Frame::Integer(5).to_integer());
    assert_eq!(
        Some(-1),
        Resp3Frame::Number {
            data: -1,
            attributes: None
        }
        .to_integer()
    );
    assert_eq!(None, Resp2Frame::SimpleString("5".into()).to_integer());
}

#[test]
fn test_to_string_bytes_accepts_simple_and_bulk_strings() {
    assert_eq!(
        Some(Bytes::from_static(b"news")),
        Resp2Frame::SimpleString("news".into()).to_string_bytes()
    );
    assert_eq!(
        Some(Bytes::from_static(b"news")),
        Resp3Frame::BlobString {
            data: "news".into(),
            attributes: None
        }
        .to_string_bytes()
    );
    assert_eq!(None, Resp2Frame::Integer(1).to_string_bytes());
}
