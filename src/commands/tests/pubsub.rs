use crate::commands::pubsub::{ChannelsCommand, NumPatCommand, NumSubCommand, PublishCommand};
use crate::commands::Command;
use alloc::vec;
use alloc::vec::Vec;
use bytes::Bytes;
use redis_protocol::resp2::types::Frame as Resp2Frame;
use redis_protocol::resp3::types::{Frame as Resp3Frame, FrameMap, FrameSet};

fn blob(data: &'static str) -> Resp3Frame {
    Resp3Frame::BlobString {
        data: Bytes::from_static(data.as_bytes()),
        attributes: None,
    }
}

fn number(data: i64) -> Resp3Frame {
    Resp3Frame::Number { data, attributes: None }
}

#[test]
fn test_publish_encode_resp2() {
    let frame: Resp2Frame = PublishCommand::new("test_channel", "test_message").encode();

    if let Resp2Frame::Array(array) = frame {
        assert_eq!(3, array.len());
        assert_eq!("PUBLISH", array[0].to_string().unwrap());
        assert_eq!("test_channel", array[1].to_string().unwrap());
        assert_eq!("test_message", array[2].to_string().unwrap());
    } else {
        panic!("Array expected");
    }
}

#[test]
fn test_publish_eval_response() {
    let command = PublishCommand::new("test_channel", "test_message");

    assert_eq!(14, command.eval_response(Resp2Frame::Integer(14)).unwrap());
    assert_eq!(3, command.eval_response(number(3)).unwrap());
    assert!(command.eval_response(blob("test")).is_err());
}

#[test]
fn test_numsub_encode_resp3() {
    let frame: Resp3Frame = NumSubCommand::new(["news", "weather"]).encode();

    if let Resp3Frame::Array { data, attributes: _ } = frame {
        assert_eq!(4, data.len());
        assert_eq!("PUBSUB", data[0].to_string().unwrap());
        assert_eq!("NUMSUB", data[1].to_string().unwrap());
        assert_eq!("news", data[2].to_string().unwrap());
        assert_eq!("weather", data[3].to_string().unwrap());
    } else {
        panic!("Array expected");
    }
}

#[test]
fn test_numsub_eval_response_resp2() {
    let command = NumSubCommand::new(["news", "weather"]);
    let response = command
        .eval_response(Resp2Frame::Array(vec![
            Resp2Frame::BulkString("news".into()),
            Resp2Frame::Integer(2),
            Resp2Frame::BulkString("weather".into()),
            Resp2Frame::Integer(0),
        ]))
        .unwrap();

    assert_eq!(2, response.len());
    assert_eq!(Some(2), response.get("news"));
    assert_eq!(Some(0), response.get("weather"));
    assert_eq!(None, response.get("sports"));
}

#[test]
fn test_numsub_eval_response_resp3_map_restores_request_order() {
    let command = NumSubCommand::new(["news", "weather"]);

    let mut map = FrameMap::new();
    map.insert(blob("weather"), number(1));
    map.insert(blob("news"), number(5));

    let response = command
        .eval_response(Resp3Frame::Map {
            data: map,
            attributes: None,
        })
        .unwrap();

    let channels: Vec<&Bytes> = response.iter().map(|(channel, _)| channel).collect();
    assert_eq!(vec![&Bytes::from_static(b"news"), &Bytes::from_static(b"weather")], channels);
    assert_eq!(Some(5), response.get("news"));
}

#[test]
fn test_numsub_eval_response_missing_channel() {
    let command = NumSubCommand::new(["news", "weather"]);
    let response = command.eval_response(Resp2Frame::Array(vec![
        Resp2Frame::BulkString("news".into()),
        Resp2Frame::Integer(2),
    ]));

    assert!(response.is_err());
}

#[test]
fn test_numsub_eval_response_odd_array() {
    let command = NumSubCommand::new(["news"]);
    let response = command.eval_response(Resp2Frame::Array(vec![Resp2Frame::BulkString("news".into())]));

    assert!(response.is_err());
}

#[test]
fn test_numpat_encode_and_eval() {
    let command = NumPatCommand::default();
    let frame: Resp2Frame = command.encode();

    if let Resp2Frame::Array(array) = frame {
        assert_eq!(2, array.len());
        assert_eq!("NUMPAT", array[1].to_string().unwrap());
    } else {
        panic!("Array expected");
    }

    assert_eq!(7, command.eval_response(Resp2Frame::Integer(7)).unwrap());
}

#[test]
fn test_channels_encode_with_pattern() {
    let frame: Resp2Frame = ChannelsCommand::new(Some(Bytes::from_static(b"news.*"))).encode();

    if let Resp2Frame::Array(array) = frame {
        assert_eq!(3, array.len());
        assert_eq!("CHANNELS", array[1].to_string().unwrap());
        assert_eq!("news.*", array[2].to_string().unwrap());
    } else {
        panic!("Array expected");
    }
}

#[test]
fn test_channels_eval_response_resp3_set() {
    let mut set = FrameSet::new();
    set.insert(blob("news"));

    let response = ChannelsCommand::new(None)
        .eval_response(Resp3Frame::Set {
            data: set,
            attributes: None,
        })
        .unwrap();

    assert_eq!(vec![Bytes::from_static(b"news")], response);
}

#[test]
fn test_channels_eval_response_non_string_element() {
    let response = ChannelsCommand::new(None).eval_response(Resp2Frame::Array(vec![Resp2Frame::Integer(1)]));
    assert!(response.is_err());
}
