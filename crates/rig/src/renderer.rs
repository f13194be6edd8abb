//! Stands in for a real renderer by writing every snapshot of the rig as a line of JSON.
//!
//! Each line has everything needed to draw a frame: whether the rig is rumbling, whether the
//! idle wiggle should play, and every droplet's offset, size, duration and delay.

use color_eyre::eyre::Result;
use tokio::io::AsyncWriteExt as _;

/// Writes snapshots to STDOUT.
pub(crate) struct Renderer;

impl Renderer {
    /// Start the render task. It ends once the controller has gone and dropped its sender.
    pub fn start(
        snapshots: tokio::sync::mpsc::Receiver<gushing_rig::controller::Snapshot>,
    ) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            Self::render_all(snapshots, &mut stdout).await?;
            tracing::debug!("Leaving renderer loop");
            Ok(())
        })
    }

    /// Render every snapshot as it arrives.
    pub async fn render_all<W: tokio::io::AsyncWrite + Unpin + Send>(
        mut snapshots: tokio::sync::mpsc::Receiver<gushing_rig::controller::Snapshot>,
        writer: &mut W,
    ) -> Result<()> {
        while let Some(snapshot) = snapshots.recv().await {
            Self::render(&snapshot, writer).await?;
        }
        Ok(())
    }

    /// Render a single snapshot.
    async fn render<W: tokio::io::AsyncWrite + Unpin + Send>(
        snapshot: &gushing_rig::controller::Snapshot,
        writer: &mut W,
    ) -> Result<()> {
        tracing::trace!(
            "Rendering eruption {} with {} droplets",
            snapshot.generation,
            snapshot.current_batch.len()
        );
        let mut line = serde_json::to_string(snapshot)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng as _;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn one_json_line_per_snapshot() {
        let config = gushing_rig::physics::RigConfig {
            droplet_count: 2,
            ..gushing_rig::physics::RigConfig::default()
        };
        let (snapshots_tx, snapshots_rx) = tokio::sync::mpsc::channel(8);
        let (controller, task) = gushing_rig::controller::Controller::new(
            &config,
            rand::rngs::StdRng::seed_from_u64(5),
            snapshots_tx,
        )
        .unwrap()
        .spawn();

        controller
            .trigger(gushing_rig::input::TriggerSource::Click)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        controller.end().await.unwrap();
        task.await.unwrap();

        let mut output: Vec<u8> = Vec::new();
        Renderer::render_all(snapshots_rx, &mut output)
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        // Initial, erupting, rumble over, spray over.
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1]["is_erupting"], true);
        assert_eq!(lines[1]["current_batch"].as_array().unwrap().len(), 2);
        assert!(lines[1]["current_batch"][0]["dx"].is_number());
        assert!(lines[1]["current_batch"][0]["delay_ms"].is_number());
        assert_eq!(lines[2]["is_erupting"], false);
        assert_eq!(lines[3]["current_batch"].as_array().unwrap().len(), 0);
        assert_eq!(lines[3]["is_idle_animation_enabled"], true);
    }
}
