use super::{Dispatch, Notifier};
use crate::errors::{AppError, AppResult};
use reqwest::blocking::Client;
use serde::Serialize;
use std::thread;
use std::time::Duration;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API sender: one POST per chat id, each on its own thread.
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    recipients: Vec<String>,
}

impl TelegramNotifier {
    pub fn new(
        api_base: &str,
        token: &str,
        recipients: Vec<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Notify(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token),
            recipients,
        })
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    fn send(client: &Client, endpoint: &str, chat_id: &str, text: &str) -> AppResult<()> {
        // the token is part of the URL: keep it out of error messages
        let res = client
            .post(endpoint)
            .json(&SendMessage { chat_id, text })
            .send()
            .map_err(|e| AppError::Notify(e.without_url().to_string()))?;

        if !res.status().is_success() {
            return Err(AppError::Notify(format!("http_{}", res.status().as_u16())));
        }
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, message: &str) -> Dispatch {
        let handles = self
            .recipients
            .iter()
            .map(|chat_id| {
                let client = self.client.clone();
                let endpoint = self.endpoint.clone();
                let chat_id = chat_id.clone();
                let text = message.to_string();

                thread::spawn(move || {
                    match Self::send(&client, &endpoint, &chat_id, &text) {
                        Ok(()) => tracing::debug!(%chat_id, "notification delivered"),
                        Err(e) => tracing::warn!(%chat_id, error = %e, "notification dropped"),
                    }
                })
            })
            .collect();

        Dispatch::from_handles(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Minimal HTTP stub: answers `n` requests, replying 500 when the body
    /// mentions `fail_for`, and forwards (path, body) of each request.
    fn stub_server(n: usize, fail_for: &'static str) -> (String, mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for stream in listener.incoming().take(n) {
                let mut stream = stream.unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();

                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    if let Some((k, v)) = line.split_once(':')
                        && k.eq_ignore_ascii_case("content-length")
                    {
                        content_length = v.trim().parse().unwrap();
                    }
                }

                let mut body = vec![0u8; content_length];
                reader.read_exact(&mut body).unwrap();
                let body = String::from_utf8(body).unwrap();

                let failed = body.contains(fail_for);
                tx.send((path, body)).unwrap();

                let status = if failed {
                    "500 Internal Server Error"
                } else {
                    "200 OK"
                };
                write!(
                    stream,
                    "HTTP/1.1 {status}\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}"
                )
                .unwrap();
            }
        });

        (base, rx)
    }

    #[test]
    fn posts_one_json_message_per_recipient() {
        let (base, rx) = stub_server(2, "never");
        let notifier = TelegramNotifier::new(
            &base,
            "TOKEN",
            vec!["111".into(), "222".into()],
            Duration::from_secs(5),
        )
        .unwrap();

        notifier.notify("hello").wait();

        let mut got: Vec<(String, String)> = rx.try_iter().collect();
        got.sort();
        assert_eq!(got.len(), 2);
        for (path, _) in &got {
            assert_eq!(path, "/botTOKEN/sendMessage");
        }
        let first: serde_json::Value = serde_json::from_str(&got[0].1).unwrap();
        assert_eq!(first["chat_id"], "111");
        assert_eq!(first["text"], "hello");
    }

    #[test]
    fn one_failing_recipient_does_not_block_the_others() {
        let (base, rx) = stub_server(2, "bad");
        let notifier = TelegramNotifier::new(
            &base,
            "TOKEN",
            vec!["bad".into(), "good".into()],
            Duration::from_secs(5),
        )
        .unwrap();

        notifier.notify("hi").wait();

        let bodies: Vec<String> = rx.try_iter().map(|(_, b)| b).collect();
        assert_eq!(bodies.len(), 2);
        assert!(bodies.iter().any(|b| b.contains("good")));
    }

    #[test]
    fn unreachable_endpoint_is_swallowed() {
        let notifier = TelegramNotifier::new(
            "http://127.0.0.1:1",
            "TOKEN",
            vec!["111".into()],
            Duration::from_secs(2),
        )
        .unwrap();

        let dispatch = notifier.notify("lost");
        assert_eq!(dispatch.len(), 1);
        dispatch.wait();
    }
}
