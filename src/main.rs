use pixport::pixel::{BLUE, WHITE};
use pixport::{logging, FpsCounter, Framebuffer, Measure, SdlPort, Toggle, WindowConfig};

/// Parse a `WxH` pair such as `128x128`
fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

/// Parse command line arguments into a window config and the debug flag
fn parse_args() -> (WindowConfig, bool) {
    let args: Vec<String> = std::env::args().collect();
    let mut config = WindowConfig {
        title: "pixport".to_string(),
        width: 128,
        height: 128,
        logical_size: Some((16, 16)),
        clear_color: BLUE,
        draw_color: WHITE,
        resizable: true,
        ..WindowConfig::default()
    };
    let mut debug = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => config.vsync = false,
            "--debug" => debug = true,
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    match WindowConfig::load(&args[i + 1]) {
                        Ok(loaded) => config = loaded,
                        Err(e) => eprintln!("Ignoring config: {}", e),
                    }
                    i += 1;
                }
            },
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        config.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        config.height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    if let Some((w, h)) = parse_size(&args[i + 1]) {
                        config.width = w;
                        config.height = h;
                    }
                    i += 1;
                }
            },
            "--logical" | "-l" => {
                if i + 1 < args.len() {
                    config.logical_size = parse_size(&args[i + 1]);
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: pixport-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config PATH, -c PATH    Load window settings from a JSON file");
                println!("  --width W, -w W           Set window width (default: 128)");
                println!("  --height H, -h H          Set window height (default: 128)");
                println!("  --resolution WxH, -r WxH  Set window size (e.g., 256x256)");
                println!("  --logical WxH, -l WxH     Set logical drawing size (default: 16x16)");
                println!("  --no-vsync                Disable VSync");
                println!("  --debug                   Verbose logging (RUST_LOG honoured)");
                println!("  --help                    Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    (config, debug)
}

fn main() -> Result<(), pixport::FramebufferError> {
    let (config, debug) = parse_args();
    logging::init(debug);
    config.validate()?;

    let mut port = SdlPort::from_config(&config)?;
    port.set_border(Toggle::No);
    let mut fb = Framebuffer::with_config(port, &config)?;
    fb.info();
    fb.open();

    // A pixel falling down the middle column, slowing as it goes
    let (logical_w, logical_h) = fb.logical_size();
    let column = logical_w / 2;
    let mut measure = Measure::start();
    let mut fps = FpsCounter::new(30);
    for i in 0..100u32 {
        fb.pump_events();
        if !fb.is_open() {
            break;
        }
        fb.clear();
        fb.draw_px(column, i % logical_h)?;
        measure.frame();
        let (dt, avg_fps) = fps.tick();
        if i % 30 == 29 {
            tracing::debug!(dt_ms = dt * 1000.0, avg_fps, "frame timing");
        }
        fb.wait(u64::from(10 + i));
    }
    measure.finish();

    if fb.is_open() {
        fb.print("ok", 0, 4);
        fb.present()?;
        fb.wait_for_close();
    }
    Ok(())
}
