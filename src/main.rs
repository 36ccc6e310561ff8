mod buffer;
mod cli;
mod color;
mod config;
mod configfmt;
mod draw;
mod error;
mod fonts;
mod gesture;
mod keyboard;
mod keymap;
mod layout;
mod render;
mod state;
mod utils;

use std::process;

use calloop::{
    signals::{Signal, Signals},
    EventLoop,
};
use calloop_wayland_source::WaylandSource;
use clap::Parser;
use wayland_client::{Connection, QueueHandle};

use cli::Args;
use config::Config;
use configfmt::ConfigFmt;
use draw::Font;
use error::Result;
use fonts::FontLoader;
use keyboard::Keyboard;
use layout::{list_layers, resolve_layers, Layouts};
use render::Renderer;
use state::{Output, State};

fn main() {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let layouts = Layouts::builtin();
    if args.list_layers {
        for name in list_layers(&layouts) {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config)?;
    if args.dump_config {
        print!("{}", ConfigFmt::default().to_string(&config)?);
        return Ok(());
    }

    let layers = resolve_layers(&layouts, &config.layers)?;
    let landscape_layers = resolve_layers(&layouts, &config.landscape_layers)?;
    for layout in layouts.iter() {
        config.xkb_layout(layout.keymap)?;
    }

    let mut keyboard = Keyboard::new(layouts, layers, landscape_layers)?;
    keyboard.set_print(config.print, config.print_intersect);

    let font = match FontLoader::from_name(&config.font) {
        Ok(f) => Some(Font::new(f, config.font_size)),
        Err(e) => {
            log::warn!("{}, drawing keys without labels", e);
            None
        }
    };
    let renderer = Renderer::new(config.schemes.clone(), config.key_border, font);

    let conn = Connection::connect_to_env()?;
    let mut event_queue = conn.new_event_queue();
    let qhandle: QueueHandle<State> = event_queue.handle();
    conn.display().get_registry(&qhandle, ());

    let mut event_loop: EventLoop<State> = EventLoop::try_new()?;
    let mut state = State::new(
        keyboard,
        Output::new(renderer, &config),
        event_loop.handle(),
        config.hidden,
    );

    event_queue.roundtrip(&mut state)?;
    state.setup(&qhandle)?;

    let handle = event_loop.handle();
    WaylandSource::new(conn, event_queue)
        .insert(handle.clone())
        .map_err(|e| e.error)?;

    let signals = Signals::new(&[Signal::SIGUSR1, Signal::SIGUSR2])?;
    let signal_qh = qhandle.clone();
    handle
        .insert_source(signals, move |event, _, state| match event.signal() {
            Signal::SIGUSR1 => state.hide(),
            Signal::SIGUSR2 => state.show(&signal_qh),
            _ => (),
        })
        .map_err(|e| e.error)?;

    while state.running {
        event_loop.dispatch(None, &mut state)?;
        let res = state.present(&qhandle);
        state.check(res);
    }

    match state.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
