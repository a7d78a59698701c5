//! Camera Session demo CLI
//!
//! Drives the full capture flow against simulated hardware: permission
//! request, preview, lens flip, torch toggle and photo capture.

use std::path::PathBuf;
use std::time::Duration;

use camera_session::{
    CameraScreen, FsMediaStore, MediaStore, MemoryMediaStore, MockPermissionGate, MockPlatform,
};
use clap::Parser;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "camera-session", version, about = "Camera capture session demo")]
struct Args {
    /// Deny the camera permission to demonstrate the permission gate.
    #[arg(long)]
    deny_permission: bool,

    /// Simulate an unavailable camera subsystem.
    #[arg(long)]
    fail_resolution: bool,

    /// Number of preview frames to pull per lens.
    #[arg(long, default_value_t = 5)]
    preview_frames: u32,

    /// Simulated bind latency in milliseconds.
    #[arg(long, default_value_t = 20)]
    bind_delay_ms: u64,

    /// Write captured photos under this directory instead of keeping them
    /// in memory.
    #[arg(long)]
    storage_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("camera-session demo v{}", camera_session::VERSION);
    info!("running against simulated camera hardware");

    let exit_code = match &args.storage_dir {
        Some(dir) => run(&args, FsMediaStore::new(dir.clone())).await,
        None => run(&args, MemoryMediaStore::new()).await,
    };
    std::process::exit(exit_code);
}

async fn run<S: MediaStore + Clone>(args: &Args, store: S) -> i32 {
    let gate = if args.deny_permission {
        MockPermissionGate::denying()
    } else {
        MockPermissionGate::granting()
    };
    let platform = if args.fail_resolution {
        MockPlatform::new().failing_resolution()
    } else {
        MockPlatform::new()
    };
    let provider = platform.provider().clone();
    provider.set_bind_delay(
        camera_session::LensSelection::Back,
        Duration::from_millis(args.bind_delay_ms),
    );
    provider.set_bind_delay(
        camera_session::LensSelection::Front,
        Duration::from_millis(args.bind_delay_ms),
    );

    let mut screen = CameraScreen::new(gate, platform, store);

    if let Err(e) = screen.start().await {
        warn!("camera screen failed to start: {e}");
        for notice in screen.notices().all() {
            eprintln!("{notice}");
        }
        return 1;
    }

    pull_frames(&mut screen, args.preview_frames).await;

    let flash = screen.toggle_flash().unwrap_or(false);
    info!("torch {}", if flash { "on" } else { "off" });

    match screen.flip_lens().await {
        Ok(lens) => info!("switched to {lens} lens"),
        Err(e) => warn!("lens switch failed: {e}"),
    }
    pull_frames(&mut screen, args.preview_frames).await;

    match screen.capture_photo().await {
        Ok(image) => println!("Photo saved to {}", image.uri),
        Err(e) => {
            warn!("capture failed: {e}");
            return 1;
        }
    }

    screen.close();
    0
}

async fn pull_frames<S>(
    screen: &mut CameraScreen<MockPermissionGate, MockPlatform, S>,
    count: u32,
) where
    S: MediaStore + Clone,
{
    for _ in 0..count {
        match screen.surface_mut().next_frame().await {
            Some(frame) => info!(
                "preview frame #{} ({}x{}, {} lens)",
                frame.sequence(),
                frame.width(),
                frame.height(),
                frame.lens()
            ),
            None => {
                warn!("preview stream ended");
                break;
            }
        }
    }
}
