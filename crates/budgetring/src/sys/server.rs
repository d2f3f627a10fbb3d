use crate::events::AppEvent;
use async_channel::Sender;
use ringchart::{Command, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if let Some(event) = parse_line(&line)
                            && tx.send(event).await.is_err()
                        {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

fn parse_line(line: &str) -> Option<AppEvent> {
    line.parse::<Command>()
        .inspect_err(|e| log::warn!("Ignoring control message {:?}: {}", line, e))
        .ok()
        .map(AppEvent::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringchart::{CategoryId, MotionMode};

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("show"), Some(AppEvent::Show));
        assert_eq!(parse_line("reload\n"), Some(AppEvent::ConfigReload));
        assert_eq!(
            parse_line("select rent"),
            Some(AppEvent::Select(CategoryId::from("rent")))
        );
        assert_eq!(
            parse_line("motion full"),
            Some(AppEvent::Motion(MotionMode::Full))
        );
        assert_eq!(parse_line("dance"), None);
        assert_eq!(parse_line(""), None);
    }
}
