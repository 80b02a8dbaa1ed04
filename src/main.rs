//! Reads frames of landmark detections from stdin, one JSON object per line, and writes one line
//! of classification results per frame to stdout.

use std::io::{self, BufRead, BufWriter, Write};

use anyhow::Context;
use nexus_vision::config::Config;
use nexus_vision::frame::{Frame, FrameClassifier, FrameInput, FrameOutput};
use nexus_vision::timer::FpsCounter;

fn main() -> anyhow::Result<()> {
    nexus_vision::init_logger!();

    let config = Config::from_env()?;
    log::debug!("{:?}", config);

    let classifier = FrameClassifier::new(config.expression);
    let mut fps = FpsCounter::new("classifier");

    let stdin = io::stdin().lock();
    let mut stdout = BufWriter::new(io::stdout().lock());
    for (i, line) in stdin.lines().enumerate() {
        let lineno = i + 1;
        let line = line.with_context(|| format!("failed to read line {lineno}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame = serde_json::from_str::<FrameInput>(&line)
            .map_err(anyhow::Error::from)
            .and_then(Frame::try_from)
            .with_context(|| format!("invalid frame on line {lineno}"))?;

        let (result, metrics) = classifier.classify_with_metrics(&frame);
        let mut output = FrameOutput::from(&result);
        if config.metrics {
            output = output.with_metrics(metrics);
        }
        serde_json::to_writer(&mut stdout, &output)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;

        fps.tick_with(classifier.timers());
    }

    Ok(())
}
