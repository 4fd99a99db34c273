//! External MP3 encoder wrapper
//!
//! Encodes the audio stream by piping it through a LAME process: PCM
//! bytes go to the child's stdin, encoded MP3 comes back on its stdout
//! and is pumped to the downstream sink by a background thread. Stderr is
//! drained to the log by a second thread; without both readers a chatty
//! encoder would fill a pipe buffer and deadlock against our writes.
//!
//! Running the encoder as a separate process keeps the pipeline free of
//! platform-specific codec bindings. Written against LAME 3.96 but not
//! version-sensitive.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use reel_core::{BitRate, ChannelMode, Mp3Settings};

use crate::error::{AudioError, Result};
use crate::sink::ByteSink;

/// Build the LAME command line for the given settings
///
/// The trailing `--quiet -` makes LAME read PCM from stdin and write MP3
/// to stdout.
pub fn command_args(settings: &Mp3Settings) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(mode) = settings.mode {
        args.push(
            match mode {
                ChannelMode::Stereo => "-ms",
                ChannelMode::JointStereo => "-mj",
                ChannelMode::Mono => "-mm",
            }
            .to_string(),
        );
    }

    match settings.bit_rate {
        Some(BitRate::Constant(Some(rate))) => args.push(format!("-b{rate}")),
        Some(BitRate::Constant(None)) => args.push("--cbr".to_string()),
        Some(BitRate::Average(rate)) => {
            args.push("--abr".to_string());
            args.push(rate.to_string());
        }
        Some(BitRate::Variable(quality)) => {
            args.push("--vbr-new".to_string());
            if let Some(quality) = quality {
                args.push(format!("-V{quality}"));
            }
        }
        None => {}
    }

    args.extend(settings.extra_args.iter().cloned());

    args.push("--quiet".to_string());
    args.push("-".to_string());
    args
}

/// Byte sink that pipes its input through an external LAME process
pub struct LameEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    pump: Option<JoinHandle<Result<()>>>,
}

impl LameEncoder {
    /// Spawn the encoder, writing its output into `out`
    ///
    /// `out` is moved to the pump thread and closed when the encoder's
    /// stdout reaches end of file.
    ///
    /// # Errors
    /// Returns an encoder error when the process cannot be spawned.
    pub fn new<S: ByteSink + 'static>(out: S, settings: &Mp3Settings) -> Result<Self> {
        let mut child = Command::new(&settings.executable)
            .args(command_args(settings))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                AudioError::Encoder(format!(
                    "failed to spawn {}: {err}",
                    settings.executable.display()
                ))
            })?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AudioError::Encoder("encoder stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AudioError::Encoder("encoder stderr unavailable".to_string()))?;

        let pump = thread::spawn(move || pump_output(stdout, out));
        thread::spawn(move || drain_stderr(stderr));

        Ok(Self {
            child,
            stdin,
            pump: Some(pump),
        })
    }

    /// Close stdin, wait for the pump to finish, and reap the child
    fn shut_down(&mut self) -> Result<()> {
        // EOF on stdin tells the encoder to finish the stream.
        drop(self.stdin.take());

        let pumped = match self.pump.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| AudioError::Encoder("encoder output pump panicked".to_string()))?,
            None => Ok(()),
        };

        let status = self
            .child
            .wait()
            .map_err(|err| AudioError::Encoder(format!("failed to wait for encoder: {err}")))?;
        if !status.success() {
            tracing::warn!(%status, "encoder exited with failure status");
        }

        pumped
    }

    fn stdin(&mut self) -> Result<&mut ChildStdin> {
        self.stdin
            .as_mut()
            .ok_or_else(|| AudioError::Encoder("encoder already closed".to_string()))
    }
}

impl ByteSink for LameEncoder {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.stdin()?.write_all(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdin()?.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.shut_down()
    }
}

impl Drop for LameEncoder {
    fn drop(&mut self) {
        if self.stdin.is_some() || self.pump.is_some() {
            if let Err(err) = self.shut_down() {
                tracing::warn!(error = %err, "encoder shutdown failed during drop");
            }
        }
    }
}

/// Pump encoded output to the downstream sink until EOF, then close it
fn pump_output<S: ByteSink>(mut stdout: impl Read, mut out: S) -> Result<()> {
    let mut buffer = [0u8; 0x1000];
    let result = loop {
        match stdout.read(&mut buffer) {
            Ok(0) => break Ok(()),
            Ok(read) => {
                if let Err(err) = out.write(&buffer[..read]) {
                    break Err(err);
                }
            }
            Err(err) => break Err(err.into()),
        }
    };

    let closed = out.close();
    result.and(closed)
}

/// Forward encoder diagnostics to the log
fn drain_stderr(stderr: impl Read) {
    for line in BufReader::new(stderr).lines() {
        match line {
            Ok(line) => tracing::debug!(target: "reel_audio::encoder", "{line}"),
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_command_streams_quietly() {
        let args = command_args(&Mp3Settings::default());
        assert_eq!(args, vec!["--quiet", "-"]);
    }

    #[test]
    fn mode_flags() {
        for (mode, flag) in [
            (ChannelMode::Stereo, "-ms"),
            (ChannelMode::JointStereo, "-mj"),
            (ChannelMode::Mono, "-mm"),
        ] {
            let settings = Mp3Settings {
                mode: Some(mode),
                ..Mp3Settings::default()
            };
            assert_eq!(command_args(&settings)[0], flag);
        }
    }

    #[test]
    fn bit_rate_flags() {
        let constant = Mp3Settings {
            bit_rate: Some(BitRate::Constant(Some(192))),
            ..Mp3Settings::default()
        };
        assert_eq!(command_args(&constant), vec!["-b192", "--quiet", "-"]);

        let average = Mp3Settings {
            bit_rate: Some(BitRate::Average(160)),
            ..Mp3Settings::default()
        };
        assert_eq!(command_args(&average), vec!["--abr", "160", "--quiet", "-"]);

        let variable = Mp3Settings {
            bit_rate: Some(BitRate::Variable(Some(2))),
            ..Mp3Settings::default()
        };
        assert_eq!(
            command_args(&variable),
            vec!["--vbr-new", "-V2", "--quiet", "-"]
        );
    }

    #[test]
    fn unset_rates_fall_back_to_encoder_defaults() {
        let constant = Mp3Settings {
            bit_rate: Some(BitRate::Constant(None)),
            ..Mp3Settings::default()
        };
        assert_eq!(command_args(&constant), vec!["--cbr", "--quiet", "-"]);

        let variable = Mp3Settings {
            bit_rate: Some(BitRate::Variable(None)),
            ..Mp3Settings::default()
        };
        assert_eq!(command_args(&variable), vec!["--vbr-new", "--quiet", "-"]);
    }

    #[test]
    fn extra_args_precede_stream_flags() {
        let settings = Mp3Settings {
            extra_args: vec!["--add-id3v2".to_string()],
            ..Mp3Settings::default()
        };
        assert_eq!(command_args(&settings), vec!["--add-id3v2", "--quiet", "-"]);
    }

    #[test]
    fn pump_copies_everything_and_closes_downstream() {
        use crate::test_utils::MemorySink;

        let sink = MemorySink::new();
        let output = sink.clone();
        let data: Vec<u8> = (0..10_000u32).map(|i| i as u8).collect();

        pump_output(std::io::Cursor::new(data.clone()), sink).unwrap();
        assert_eq!(output.bytes(), data);
    }

    #[test]
    fn missing_executable_is_an_encoder_error() {
        let settings = Mp3Settings {
            executable: PathBuf::from("/nonexistent/lame-binary"),
            ..Mp3Settings::default()
        };
        assert!(matches!(
            LameEncoder::new(crate::sink::NullSink, &settings),
            Err(AudioError::Encoder(_))
        ));
    }
}
