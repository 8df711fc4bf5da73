//! Integration test: loopback UDP end to end.
//!
//! Starts the relay on fixed local ports, feeds RTP-sized datagrams into
//! its ingress socket, and verifies the framed batch arriving at a test
//! socket standing in for the OBU.

use std::net::UdpSocket;
use std::time::Duration;

use v2xrelay::{EnvelopeConfig, Relay, RelayConfig, envelope, frame};

/// Fixed ports for the integration tests; each test uses its own pair.
const PLAIN_INGRESS: &str = "127.0.0.1:29300";
const PLAIN_OBU: &str = "127.0.0.1:29299";
const TLV_INGRESS: &str = "127.0.0.1:29302";
const TLV_OBU: &str = "127.0.0.1:29301";
const EOF_INGRESS: &str = "127.0.0.1:29304";
const EOF_OBU: &str = "127.0.0.1:29303";

fn config(ingress: &str, obu: &str) -> RelayConfig {
    RelayConfig {
        bind_addr: ingress.parse().unwrap(),
        remote_addr: obu.parse().unwrap(),
        flush_period: Duration::from_millis(40),
        ..RelayConfig::default()
    }
}

fn recv_message(obu: &UdpSocket) -> Vec<u8> {
    let mut buf = [0u8; 4096];
    let (len, _peer) = obu.recv_from(&mut buf).expect("batch within timeout");
    buf[..len].to_vec()
}

#[test]
fn framed_batch_reaches_the_obu() {
    let obu = UdpSocket::bind(PLAIN_OBU).expect("bind OBU socket");
    obu.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

    let mut relay = Relay::new(config(PLAIN_INGRESS, PLAIN_OBU)).expect("valid config");
    relay.start().expect("relay start");

    let pipeline = UdpSocket::bind("127.0.0.1:0").expect("bind pipeline socket");
    for tag in [b'a', b'b', b'c'] {
        pipeline
            .send_to(&vec![tag; 100], PLAIN_INGRESS)
            .expect("send datagram");
    }

    // All three datagrams fit one batch; drain until they all arrived in
    // case a flush tick split them.
    let mut items: Vec<Vec<u8>> = Vec::new();
    let mut batches = 0;
    while items.len() < 3 {
        let message = recv_message(&obu);
        assert_eq!(message[0], frame::PACKET_TYPE);
        items.extend(frame::decode(&message).expect("well-formed batch"));
        batches += 1;
    }

    if batches == 1 {
        // Newest first within a single batch.
        assert_eq!(
            items,
            vec![vec![b'c'; 100], vec![b'b'; 100], vec![b'a'; 100]]
        );
    } else {
        // Split across ticks: arrival order across batches.
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(
            sorted,
            vec![vec![b'a'; 100], vec![b'b'; 100], vec![b'c'; 100]]
        );
    }

    relay.stop();
    relay.join().expect("clean shutdown");
}

#[test]
fn tlv_mode_wraps_the_batch() {
    let obu = UdpSocket::bind(TLV_OBU).expect("bind OBU socket");
    obu.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

    let mut relay_config = config(TLV_INGRESS, TLV_OBU);
    relay_config.envelope = Some(EnvelopeConfig::default());
    let mut relay = Relay::new(relay_config).expect("valid config");
    relay.start().expect("relay start");

    let pipeline = UdpSocket::bind("127.0.0.1:0").expect("bind pipeline socket");
    pipeline
        .send_to(&[0x42; 64], TLV_INGRESS)
        .expect("send datagram");

    let message = recv_message(&obu);

    // Envelope header, then the framed batch verbatim.
    assert_eq!(&message[0..4], &[0x00, 0x00, 0x00, 0x70]);
    assert_eq!(&message[4..8], &[0x00, 0x00, 0x00, 0x0b]);
    assert_eq!(&message[8..12], &[0x00, 0x00, 0x00, 0x7f]);
    assert_eq!(&message[12..16], &[0x00, 0x00, 0xff, 0xff]);
    assert_eq!(message[16], 1);

    let items = frame::decode(&message[envelope::HEADER_LEN..]).expect("well-formed inner batch");
    assert_eq!(items, vec![vec![0x42; 64]]);

    relay.stop();
    relay.join().expect("clean shutdown");
}

#[test]
fn empty_datagram_is_fatal() {
    let _obu = UdpSocket::bind(EOF_OBU).expect("bind OBU socket");

    let mut relay = Relay::new(config(EOF_INGRESS, EOF_OBU)).expect("valid config");
    relay.start().expect("relay start");

    let pipeline = UdpSocket::bind("127.0.0.1:0").expect("bind pipeline socket");
    pipeline
        .send_to(&[], EOF_INGRESS)
        .expect("send empty datagram");

    // The ingest path treats the zero-length receive as transport EOF;
    // join surfaces the fatal error.
    let err = relay.join().expect_err("relay should terminate");
    assert!(matches!(
        err,
        v2xrelay::RelayError::ConnectionBroken {
            direction: v2xrelay::Direction::Inbound
        }
    ));
    assert!(!relay.is_running());
}
