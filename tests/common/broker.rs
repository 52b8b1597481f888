//! Minimal MQTT 3.1.1 broker speaking just enough of the protocol to drive
//! the client: CONNECT, SUBSCRIBE, PUBLISH (QoS 0/1), PINGREQ, DISCONNECT.

use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

/// A packet the broker received, tagged by connection index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Connect,
    Subscribe(String),
    Publish { topic: String, payload: Vec<u8> },
    PingReq,
    Disconnect,
}

#[derive(Debug, Clone, Default)]
pub struct BrokerScript {
    /// Never answer CONNECT
    pub silent: bool,
    /// Never answer SUBSCRIBE
    pub ignore_subscribe: bool,
    /// SUBACK return code: 0x00-0x02 granted, 0x80 failure
    pub suback_code: u8,
    /// Sent to the client just before every SUBACK
    pub publish_before_suback: Option<(String, Vec<u8>)>,
    /// Close the first connection right after its SUBACK
    pub drop_first_connection: bool,
}

pub struct FakeBroker {
    pub port: u16,
    events: UnboundedReceiver<(usize, Seen)>,
}

impl FakeBroker {
    pub async fn start(script: BrokerScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, events) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut conn = 0;
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, conn, script.clone(), tx.clone()));
                conn += 1;
            }
        });

        Self { port, events }
    }

    /// Wait up to `limit` for a packet accepted by `wanted`
    pub async fn wait_for(
        &mut self,
        limit: Duration,
        mut wanted: impl FnMut(usize, &Seen) -> bool,
    ) -> Option<(usize, Seen)> {
        let events = &mut self.events;
        tokio::time::timeout(limit, async move {
            while let Some((conn, seen)) = events.recv().await {
                if wanted(conn, &seen) {
                    return Some((conn, seen));
                }
            }
            None
        })
        .await
        .ok()
        .flatten()
    }

    /// Everything received during `window`
    pub async fn collect(&mut self, window: Duration) -> Vec<(usize, Seen)> {
        let mut seen = Vec::new();
        let events = &mut self.events;
        let _ = tokio::time::timeout(window, async {
            while let Some(event) = events.recv().await {
                seen.push(event);
            }
        })
        .await;
        seen
    }
}

pub fn publish_packet(topic: &str, payload: &[u8]) -> Vec<u8> {
    let length = 2 + topic.len() + payload.len();
    assert!(length < 128, "single-byte remaining length only");

    let mut packet = vec![0x30, length as u8, 0, topic.len() as u8];
    packet.extend_from_slice(topic.as_bytes());
    packet.extend_from_slice(payload);
    packet
}

fn read_topic(bytes: &[u8]) -> String {
    let length = usize::from(u16::from_be_bytes([bytes[0], bytes[1]]));
    String::from_utf8_lossy(&bytes[2..2 + length]).into_owned()
}

async fn read_length(stream: &mut TcpStream) -> Option<usize> {
    let mut length = 0usize;
    for shift in [0, 7, 14, 21] {
        let byte = stream.read_u8().await.ok()?;
        length |= usize::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Some(length);
        }
    }
    None
}

async fn serve(
    mut stream: TcpStream,
    conn: usize,
    script: BrokerScript,
    tx: UnboundedSender<(usize, Seen)>,
) {
    loop {
        let Ok(header) = stream.read_u8().await else { return };
        let Some(length) = read_length(&mut stream).await else { return };
        let mut body = vec![0u8; length];
        if stream.read_exact(&mut body).await.is_err() {
            return;
        }

        let mut reply = Vec::new();
        let mut close = false;
        match header >> 4 {
            1 => {
                let _ = tx.send((conn, Seen::Connect));
                if !script.silent {
                    reply.extend_from_slice(&[0x20, 0x02, 0x00, 0x00]);
                }
            }
            8 => {
                let _ = tx.send((conn, Seen::Subscribe(read_topic(&body[2..]))));
                if !script.ignore_subscribe {
                    if let Some((topic, payload)) = &script.publish_before_suback {
                        reply.extend(publish_packet(topic, payload));
                    }
                    reply.extend_from_slice(&[0x90, 0x03, body[0], body[1], script.suback_code]);
                    close = script.drop_first_connection && conn == 0;
                }
            }
            3 => {
                let topic = read_topic(&body);
                let mut offset = 2 + topic.len();
                if (header >> 1) & 0x03 > 0 {
                    reply.extend_from_slice(&[0x40, 0x02, body[offset], body[offset + 1]]);
                    offset += 2;
                }
                let payload = body[offset..].to_vec();
                let _ = tx.send((conn, Seen::Publish { topic, payload }));
            }
            12 => {
                let _ = tx.send((conn, Seen::PingReq));
                reply.extend_from_slice(&[0xd0, 0x00]);
            }
            14 => {
                let _ = tx.send((conn, Seen::Disconnect));
                return;
            }
            _ => {}
        }

        if !reply.is_empty() && stream.write_all(&reply).await.is_err() {
            return;
        }
        if close {
            return;
        }
    }
}
