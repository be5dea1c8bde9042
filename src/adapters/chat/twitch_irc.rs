use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use chrono::{DateTime, FixedOffset, Utc};

use crate::core::errors::{FocusError, Result};
use crate::core::models::focus_record::FocusRecord;

/// Chat identity and the command that triggers a focus record.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub channel: String,
    pub nick: String,
    /// Full trigger word, e.g. `!focus`.
    pub trigger: String,
    /// Offset applied to the server's UTC message timestamps.
    pub offset: FixedOffset,
}

/// One parsed IRC line: `[@tags] [:prefix] COMMAND params... [:trailing]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IrcLine {
    pub tags: HashMap<String, String>,
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcLine {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut rest = raw.trim_end_matches(['\r', '\n']);
        let mut line = IrcLine::default();

        if let Some(stripped) = rest.strip_prefix('@') {
            let (tags, tail) = stripped.split_once(' ')?;
            line.tags = tags
                .split(';')
                .filter_map(|kv| match kv.split_once('=') {
                    Some((k, v)) => Some((k.to_string(), v.to_string())),
                    None if !kv.is_empty() => Some((kv.to_string(), String::new())),
                    None => None,
                })
                .collect();
            rest = tail.trim_start();
        }

        if let Some(stripped) = rest.strip_prefix(':') {
            let (prefix, tail) = stripped.split_once(' ')?;
            line.prefix = Some(prefix.to_string());
            rest = tail.trim_start();
        }

        let (head, trailing) = match rest.split_once(" :") {
            Some((h, t)) => (h, Some(t)),
            None => (rest, None),
        };
        let mut words = head.split_whitespace();
        line.command = words.next()?.to_string();
        line.params = words.map(str::to_string).collect();
        if let Some(t) = trailing {
            line.params.push(t.to_string());
        }

        Some(line)
    }

    /// Nick of the sender, from `nick!user@host`.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split('!').next().unwrap_or(prefix))
    }
}

/// Turn a PRIVMSG into a focus record when its first word is `trigger`.
///
/// The message is the rest of the text, trimmed. The timestamp comes from
/// the `tmi-sent-ts` tag, falling back to now.
pub fn extract_focus(line: &IrcLine, trigger: &str, offset: FixedOffset) -> Option<FocusRecord> {
    if line.command != "PRIVMSG" {
        return None;
    }
    let text = line.params.get(1)?.trim();
    let (first, rest) = match text.split_once(char::is_whitespace) {
        Some((f, r)) => (f, r),
        None => (text, ""),
    };
    if first != trigger {
        return None;
    }

    let author = line.nick()?;
    let sent = line
        .tags
        .get("tmi-sent-ts")
        .and_then(|ms| ms.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now);

    Some(FocusRecord::new(
        author,
        rest.trim(),
        sent.with_timezone(&offset),
    ))
}

/// TLS stream to the chat server.
pub type TlsStream = StreamOwned<ClientConnection, TcpStream>;

/// A Twitch chat session over any byte stream.
pub struct ChatSession<S: Read + Write> {
    stream: BufReader<S>,
    settings: ChatSettings,
}

fn tls_error(addr: &str, e: impl std::fmt::Display) -> FocusError {
    FocusError::ChatError {
        reason: format!("TLS setup for {addr} failed: {e}"),
    }
}

/// Host part of `host:port`.
pub fn host_of(addr: &str) -> &str {
    addr.rsplit_once(':').map_or(addr, |(host, _)| host)
}

/// Open a TLS connection to `addr` (e.g. `irc.chat.twitch.tv:6697`).
///
/// The server certificate is checked against the webpki root set.
pub fn connect(addr: &str, settings: ChatSettings) -> Result<ChatSession<TlsStream>> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| tls_error(addr, e))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    let server_name =
        ServerName::try_from(host_of(addr).to_string()).map_err(|e| tls_error(addr, e))?;
    let conn = ClientConnection::new(Arc::new(config), server_name).map_err(|e| tls_error(addr, e))?;

    let tcp = TcpStream::connect(addr).map_err(|e| FocusError::ChatError {
        reason: format!("Cannot connect to {addr}: {e}"),
    })?;
    tracing::info!(addr, channel = %settings.channel, "connected to chat");
    Ok(ChatSession::new(StreamOwned::new(conn, tcp), settings))
}

impl<S: Read + Write> ChatSession<S> {
    pub fn new(stream: S, settings: ChatSettings) -> Self {
        Self {
            stream: BufReader::new(stream),
            settings,
        }
    }

    #[cfg(test)]
    fn stream(&self) -> &S {
        self.stream.get_ref()
    }

    fn send(&mut self, line: &str) -> Result<()> {
        let writer = self.stream.get_mut();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\r\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Authenticate, request message tags and join the channel.
    pub fn login(&mut self, access_token: &str) -> Result<()> {
        let token = access_token.trim_start_matches("oauth:");
        self.send(&format!("PASS oauth:{token}"))?;
        self.send(&format!("NICK {}", self.settings.nick))?;
        self.send("CAP REQ :twitch.tv/tags")?;
        self.send(&format!("JOIN #{}", self.settings.channel))
    }

    /// Send a chat message to the joined channel.
    pub fn say(&mut self, text: &str) -> Result<()> {
        let line = format!("PRIVMSG #{} :{text}", self.settings.channel);
        self.send(&line)
    }

    /// Read lines until the session ends.
    ///
    /// `on_focus` returns `true` when the record was written, which sends
    /// the acknowledgment. Handler errors are logged and the session
    /// keeps going. The session never ends cleanly: a closed connection or
    /// a server `RECONNECT` is returned as `ChatError` so a supervisor
    /// restarts the bot.
    pub fn run<F>(&mut self, mut on_focus: F) -> Result<()>
    where
        F: FnMut(&FocusRecord) -> Result<bool>,
    {
        let mut raw = String::new();
        loop {
            raw.clear();
            if self.stream.read_line(&mut raw)? == 0 {
                return Err(FocusError::ChatError {
                    reason: "Connection closed by server".into(),
                });
            }

            let Some(line) = IrcLine::parse(&raw) else {
                continue;
            };

            match line.command.as_str() {
                "PING" => {
                    let token = line.params.first().map(String::as_str).unwrap_or("tmi.twitch.tv");
                    self.send(&format!("PONG :{token}"))?;
                }
                "RECONNECT" => {
                    return Err(FocusError::ChatError {
                        reason: "Server requested a reconnect".into(),
                    });
                }
                "NOTICE" if line.params.last().is_some_and(|m| m.contains("authentication failed")) => {
                    return Err(FocusError::ChatError {
                        reason: "Login authentication failed. Check ACCESS_TOKEN.".into(),
                    });
                }
                "PRIVMSG" => {
                    let Some(record) =
                        extract_focus(&line, &self.settings.trigger, self.settings.offset)
                    else {
                        continue;
                    };

                    match on_focus(&record) {
                        Ok(true) => {
                            let ack = format!("{} is focusing: {}.", record.author, record.message);
                            self.say(&ack)?;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            tracing::error!(author = %record.author, error = %e, "failed to record focus");
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Scripted server input; everything written is kept in `sent`.
    struct ScriptedStream {
        input: Cursor<Vec<u8>>,
        sent: Vec<u8>,
    }

    impl ScriptedStream {
        fn new(input: &str) -> Self {
            Self {
                input: Cursor::new(input.as_bytes().to_vec()),
                sent: Vec::new(),
            }
        }
    }

    impl Read for ScriptedStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for ScriptedStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.sent.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn settings() -> ChatSettings {
        ChatSettings {
            channel: "bedtimebear_808".into(),
            nick: "focusbot".into(),
            trigger: "!focus".into(),
            offset: FixedOffset::west_opt(7 * 3600).unwrap(),
        }
    }

    fn session(input: &str) -> ChatSession<ScriptedStream> {
        ChatSession::new(ScriptedStream::new(input), settings())
    }

    fn sent(session: &ChatSession<ScriptedStream>) -> String {
        String::from_utf8(session.stream().sent.clone()).unwrap()
    }

    const FOCUS_LINE: &str = "@badge-info=;display-name=MrBear;tmi-sent-ts=1664632860000 \
        :mrbear!mrbear@mrbear.tmi.twitch.tv PRIVMSG #bedtimebear_808 :!focus  writing the intro \r\n";

    #[test]
    fn parses_tags_prefix_and_trailing() {
        let line = IrcLine::parse(FOCUS_LINE).unwrap();
        assert_eq!(line.command, "PRIVMSG");
        assert_eq!(line.nick(), Some("mrbear"));
        assert_eq!(line.tags["tmi-sent-ts"], "1664632860000");
        assert_eq!(line.tags["badge-info"], "");
        assert_eq!(line.params[0], "#bedtimebear_808");
        assert_eq!(line.params[1], "!focus  writing the intro ");
    }

    #[test]
    fn parses_ping_without_prefix() {
        let line = IrcLine::parse("PING :tmi.twitch.tv\r\n").unwrap();
        assert_eq!(line.command, "PING");
        assert_eq!(line.params, vec!["tmi.twitch.tv".to_string()]);
    }

    #[test]
    fn extracts_focus_with_server_timestamp() {
        let line = IrcLine::parse(FOCUS_LINE).unwrap();
        let record = extract_focus(&line, "!focus", settings().offset).unwrap();

        assert_eq!(record.author, "mrbear");
        assert_eq!(record.message, "writing the intro");
        // 2022-10-01T14:01:00Z at -07:00
        assert_eq!(record.timestamp.to_rfc3339(), "2022-10-01T07:01:00-07:00");
    }

    #[test]
    fn ignores_other_commands_and_lookalikes() {
        let plain = IrcLine::parse(":a!a@a PRIVMSG #c :hello there").unwrap();
        let lookalike = IrcLine::parse(":a!a@a PRIVMSG #c :!focusing hard").unwrap();
        let offset = settings().offset;

        assert!(extract_focus(&plain, "!focus", offset).is_none());
        assert!(extract_focus(&lookalike, "!focus", offset).is_none());
    }

    #[test]
    fn bare_trigger_records_empty_message() {
        let line = IrcLine::parse(":a!a@a PRIVMSG #c :!focus").unwrap();
        let record = extract_focus(&line, "!focus", settings().offset).unwrap();
        assert_eq!(record.message, "");
    }

    #[test]
    fn host_is_taken_from_address() {
        assert_eq!(host_of("irc.chat.twitch.tv:6697"), "irc.chat.twitch.tv");
        assert_eq!(host_of("localhost"), "localhost");
    }

    #[test]
    fn login_sends_handshake() {
        let mut session = session("");
        session.login("oauth:secret").unwrap();

        assert_eq!(
            sent(&session),
            "PASS oauth:secret\r\nNICK focusbot\r\nCAP REQ :twitch.tv/tags\r\nJOIN #bedtimebear_808\r\n"
        );
    }

    #[test]
    fn run_answers_ping_and_acks_recorded_focus() {
        let mut session = session(&format!("PING :tmi.twitch.tv\r\n{FOCUS_LINE}"));
        let mut seen = Vec::new();

        let err = session
            .run(|record| {
                seen.push(record.clone());
                Ok(true)
            })
            .unwrap_err();

        assert!(matches!(err, FocusError::ChatError { .. }));
        assert_eq!(seen.len(), 1);
        assert_eq!(
            sent(&session),
            "PONG :tmi.twitch.tv\r\nPRIVMSG #bedtimebear_808 :mrbear is focusing: writing the intro.\r\n"
        );
    }

    #[test]
    fn run_skips_ack_when_not_recorded_or_failed() {
        let mut session = session(&format!("{FOCUS_LINE}{FOCUS_LINE}"));
        let mut calls = 0;

        let _ = session.run(|_| {
            calls += 1;
            if calls == 1 {
                Ok(false)
            } else {
                Err(FocusError::ChatError { reason: "boom".into() })
            }
        });

        assert_eq!(calls, 2);
        assert!(session.stream().sent.is_empty());
    }

    #[test]
    fn closed_connection_is_an_error() {
        let mut session = session("");

        let err = session.run(|_| Ok(true)).unwrap_err();
        assert!(err.to_string().contains("Connection closed"));
    }

    #[test]
    fn reconnect_request_is_an_error() {
        let mut session = session(&format!(":tmi.twitch.tv RECONNECT\r\n{FOCUS_LINE}"));
        let mut calls = 0;

        let err = session
            .run(|_| {
                calls += 1;
                Ok(true)
            })
            .unwrap_err();

        assert!(err.to_string().contains("reconnect"));
        assert_eq!(calls, 0);
    }

    #[test]
    fn run_fails_on_auth_notice() {
        let mut session = session(":tmi.twitch.tv NOTICE * :Login authentication failed\r\n");

        let err = session.run(|_| Ok(true)).unwrap_err();
        assert!(err.to_string().contains("authentication failed"));
    }
}
