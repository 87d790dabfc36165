use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::browser::driver::BrowserDriver;
use crate::browser::playwright::ElementRef;
use crate::error::ExplorerError;
use crate::screen::screen_model::ElementDescriptor;

/// Request sent to the browser server over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Elements {
        cmd: &'static str,
        selector: String,
    },
    Fill {
        cmd: &'static str,
        target: ElementRef,
        value: String,
        delay_ms: u64,
    },
    Click {
        cmd: &'static str,
        target: ElementRef,
    },
    ClickAt {
        cmd: &'static str,
        x: f64,
        y: f64,
    },
    Wait {
        cmd: &'static str,
        duration_ms: u64,
    },
    Screenshot {
        cmd: &'static str,
        path: String,
        full_page: bool,
    },
    Simple {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn elements(selector: &str) -> Self {
        BrowserRequest::Elements {
            cmd: "elements",
            selector: selector.to_string(),
        }
    }

    pub fn fill(target: &ElementRef, value: &str, delay_ms: u64) -> Self {
        BrowserRequest::Fill {
            cmd: "fill",
            target: target.clone(),
            value: value.to_string(),
            delay_ms,
        }
    }

    pub fn click(target: &ElementRef) -> Self {
        BrowserRequest::Click {
            cmd: "click",
            target: target.clone(),
        }
    }

    pub fn click_at(x: f64, y: f64) -> Self {
        BrowserRequest::ClickAt {
            cmd: "click_at",
            x,
            y,
        }
    }

    pub fn wait(duration_ms: u64) -> Self {
        BrowserRequest::Wait {
            cmd: "wait",
            duration_ms,
        }
    }

    pub fn screenshot(path: &str) -> Self {
        BrowserRequest::Screenshot {
            cmd: "screenshot",
            path: path.to_string(),
            full_page: true,
        }
    }

    pub fn current_url() -> Self {
        BrowserRequest::Simple { cmd: "current_url" }
    }

    pub fn content() -> Self {
        BrowserRequest::Simple { cmd: "content" }
    }

    pub fn quit() -> Self {
        BrowserRequest::Simple { cmd: "quit" }
    }
}

/// Response received from the browser server over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A persistent browser session backed by a Node.js browser server.
///
/// The server keeps one Chromium page open. Commands are sent as NDJSON over
/// stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    type_delay_ms: u64,
}

impl BrowserSession {
    /// Spawn the browser server script and wait for its ready line.
    pub fn launch(script: &str, type_delay_ms: u64) -> Result<Self, ExplorerError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ExplorerError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ExplorerError::SessionIO(format!("Failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ExplorerError::SessionIO(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| {
            ExplorerError::SessionIO(format!("Failed to read ready signal: {}", e))
        })?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| ExplorerError::JsonParse {
                context: "browser server ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(ExplorerError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser server".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            type_delay_ms,
        })
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, ExplorerError> {
        let json = serde_json::to_string(request).map_err(|e| ExplorerError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        debug!(request = %json, "browser command");

        writeln!(self.stdin, "{}", json).map_err(|e| {
            ExplorerError::SessionIO(format!("Failed to write to browser server stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            ExplorerError::SessionIO(format!("Failed to flush browser server stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            ExplorerError::SessionIO(format!("Failed to read from browser server stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(ExplorerError::SessionIO(
                "Empty response from browser server (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| ExplorerError::JsonParse {
            context: "browser server response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, ExplorerError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(ExplorerError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    pub fn quit(&mut self) -> Result<(), ExplorerError> {
        // Best-effort: the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl BrowserDriver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), ExplorerError> {
        self.send_ok(&BrowserRequest::navigate(url), "navigate")?;
        Ok(())
    }

    fn get_elements(&mut self, selector: &str) -> Result<Vec<ElementDescriptor>, ExplorerError> {
        let response = self.send_ok(&BrowserRequest::elements(selector), "elements")?;
        let data = response.data.ok_or_else(|| ExplorerError::SessionProtocol {
            command: "elements".into(),
            error: "No data in elements response".into(),
        })?;
        serde_json::from_value(data).map_err(|e| ExplorerError::JsonParse {
            context: format!("elements for '{}'", selector),
            source: e,
        })
    }

    fn fill(&mut self, target: &ElementRef, value: &str) -> Result<(), ExplorerError> {
        let request = BrowserRequest::fill(target, value, self.type_delay_ms);
        self.send_ok(&request, "fill")?;
        Ok(())
    }

    fn click(&mut self, target: &ElementRef) -> Result<(), ExplorerError> {
        self.send_ok(&BrowserRequest::click(target), "click")?;
        Ok(())
    }

    fn click_at(&mut self, x: f64, y: f64) -> Result<(), ExplorerError> {
        self.send_ok(&BrowserRequest::click_at(x, y), "click_at")?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, ExplorerError> {
        let response = self.send_ok(&BrowserRequest::current_url(), "current_url")?;
        response.url.ok_or_else(|| ExplorerError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })
    }

    fn serialized_content(&mut self) -> Result<String, ExplorerError> {
        let response = self.send_ok(&BrowserRequest::content(), "content")?;
        response.content.ok_or_else(|| ExplorerError::SessionProtocol {
            command: "content".into(),
            error: "No content in content response".into(),
        })
    }

    fn wait(&mut self, ms: u64) -> Result<(), ExplorerError> {
        self.send_ok(&BrowserRequest::wait(ms), "wait")?;
        Ok(())
    }

    fn screenshot(&mut self, path: &str) -> Result<(), ExplorerError> {
        self.send_ok(&BrowserRequest::screenshot(path), "screenshot")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
