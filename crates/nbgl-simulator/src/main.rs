//! Desktop simulator for the nbgl-rs use cases.
//!
//! Renders the use cases in an SDL2 window via `embedded-graphics-simulator`,
//! through the engine's `DisplayFrontend`. Mouse buttons act as the finger.
//!
//! # Key bindings
//!
//! | Key | Use case                     |
//! |-----|------------------------------|
//! | 1   | Home page and settings       |
//! | 2   | Transaction review           |
//! | 3   | Streamed review              |
//! | 4   | Address verification         |
//! | 5   | Spinner                      |
//! | 6   | PIN keypad                   |
//! | 7   | Choice                       |
//! | 8   | Blind signing review         |
//! | F   | Toggle Stax / Flex profile   |
//! | Q   | Quit                         |

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info};

use nbgl::content::{
    BarsList, ChoicesList, Content, InfosList, Pairs, SwitchItem, TagValueListContent,
};
use nbgl::frontend::DisplayFrontend;
use nbgl::icons;
use nbgl::layout::TagValue;
use nbgl::touch::TouchSample;
use nbgl::types::{NO_TUNE, State};
use nbgl::use_case::{FIRST_USER_TOKEN, HomeDesc, Operation, ReviewStatus};
use nbgl::{NbglResult, Profile, UseCaseEvent, UseCases};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 1;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

const BLIND_SIGNING_TOKEN: u8 = FIRST_USER_TOKEN;
const LANGUAGE_TOKEN: u8 = FIRST_USER_TOKEN + 1;
const RESET_TOKEN: u8 = FIRST_USER_TOKEN + 2;

const ADDRESS: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";

type Simulator = UseCases<DisplayFrontend<SimulatorDisplay<Rgb565>>>;

// ---------------------------------------------------------------------------
// Demo flows
// ---------------------------------------------------------------------------

/// Which flow runs, to chain the next step on its outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Home,
    Review,
    BlindReview,
    Streaming(u8),
    Address,
    Spinner,
    Keypad,
    Choice,
    Status,
}

fn pairs() -> TagValueListContent {
    TagValueListContent::new(Pairs::Inline(vec![
        TagValue::new("Amount", "0.0125 BTC"),
        TagValue::new("To", ADDRESS),
        TagValue::new("Fees", "0.00002 BTC"),
        TagValue::new(
            "Memo",
            "A rather long memo, long enough to be cut on the review page and shown in full behind the More button. \
             It keeps going so that its details need more than one page once opened, which exercises the modal \
             navigation of the details view as well as the line cutting of the value.",
        ),
    ]))
}

fn home() -> HomeDesc {
    let settings = vec![
        Content::SwitchesList(vec![
            SwitchItem::new("Blind signing", State::Off, BLIND_SIGNING_TOKEN)
                .with_sub_text("Enable transaction blind signing"),
        ]),
        Content::ChoicesList(ChoicesList {
            names: ["English", "Français", "Deutsch", "Español", "Italiano", "Português"]
                .map(String::from)
                .to_vec(),
            init_choice: 0,
            token: LANGUAGE_TOKEN,
            tune: NO_TUNE,
        }),
        Content::BarsList(BarsList {
            texts: vec!["Reset settings".into()],
            tokens: vec![RESET_TOKEN],
            tune: NO_TUNE,
        }),
    ];
    let mut infos = InfosList::new([("Version", "1.0.0"), ("Developer", "nbgl-rs")]);
    infos.extensions = vec![None, Some("The nbgl-rs contributors".into())];
    HomeDesc::new("Bitcoin")
        .with_icon(icons::CHECK_CIRCLE)
        .with_action("Show address")
        .with_settings(settings)
        .with_infos(infos)
}

fn start(uc: &mut Simulator, demo: Demo) -> NbglResult<()> {
    info!("Starting {:?}", demo);
    match demo {
        Demo::Home => uc.home_and_settings(home()),
        Demo::Review => uc.review(
            Operation::Transaction,
            pairs(),
            Some(icons::CHECK_CIRCLE),
            "Review transaction\nto send BTC",
            None,
            "Sign transaction\nto send BTC?",
        ),
        Demo::BlindReview => uc.review_blind_signing(
            Operation::Transaction,
            pairs(),
            Some(icons::CHECK_CIRCLE),
            "Review transaction\nto send BTC",
            None,
            "Sign transaction\nto send BTC?",
        ),
        Demo::Streaming(0) => uc.review_streaming_start(
            Operation::Transaction,
            Some(icons::CHECK_CIRCLE),
            "Review transaction",
            Some("Streamed in steps"),
        ),
        Demo::Streaming(1) => uc.review_streaming_continue(pairs(), true),
        Demo::Streaming(_) => uc.review_streaming_finish("Sign transaction?"),
        Demo::Address => uc.address_review(ADDRESS, Vec::new(), Some(icons::QR_CODE), "Verify BTC address", None),
        Demo::Spinner => uc.spinner("Processing"),
        Demo::Keypad => uc.keypad("Enter your PIN", 4, 8, true, true),
        Demo::Choice => uc.choice(
            Some(icons::WARNING),
            "Reset settings?",
            Some("All settings will go back to their default value"),
            "Reset",
            "Cancel",
        ),
        Demo::Status => Ok(()),
    }
}

/// Chain what follows `event`; returns the new demo
fn on_event(uc: &mut Simulator, demo: Demo, event: UseCaseEvent) -> NbglResult<Demo> {
    info!("{:?} reported {:?}", demo, event);
    let next = match (demo, event) {
        (Demo::Home, UseCaseEvent::HomeAction) => Demo::Address,
        (Demo::Streaming(step), UseCaseEvent::Choice(true)) if step < 2 => Demo::Streaming(step + 1),
        (Demo::Streaming(_), UseCaseEvent::Skipped) => Demo::Streaming(2),
        (Demo::Review | Demo::BlindReview | Demo::Streaming(_), UseCaseEvent::Choice(signed)) => {
            let status = if signed {
                ReviewStatus::Signed(Operation::Transaction)
            } else {
                ReviewStatus::Rejected(Operation::Transaction)
            };
            uc.review_status(status)?;
            return Ok(Demo::Status);
        }
        (Demo::Address, UseCaseEvent::Choice(verified)) => {
            let status = if verified {
                ReviewStatus::AddressVerified
            } else {
                ReviewStatus::AddressRejected
            };
            uc.review_status(status)?;
            return Ok(Demo::Status);
        }
        (Demo::Keypad, UseCaseEvent::Pin(pin)) => {
            uc.status(&format!("PIN of {} digits", pin.len()), true)?;
            return Ok(Demo::Status);
        }
        (Demo::Choice, UseCaseEvent::Choice(reset)) => {
            uc.status(if reset { "Settings reset" } else { "Nothing changed" }, reset)?;
            return Ok(Demo::Status);
        }
        (Demo::Home, UseCaseEvent::Control { token: RESET_TOKEN, .. }) => Demo::Choice,
        (Demo::Home, UseCaseEvent::Control { .. }) => return Ok(demo),
        _ => Demo::Home,
    };
    start(uc, next)?;
    Ok(next)
}

fn keycode_to_demo(keycode: Keycode) -> Option<Demo> {
    match keycode {
        Keycode::Num1 | Keycode::Kp1 => Some(Demo::Home),
        Keycode::Num2 | Keycode::Kp2 => Some(Demo::Review),
        Keycode::Num3 | Keycode::Kp3 => Some(Demo::Streaming(0)),
        Keycode::Num4 | Keycode::Kp4 => Some(Demo::Address),
        Keycode::Num5 | Keycode::Kp5 => Some(Demo::Spinner),
        Keycode::Num6 | Keycode::Kp6 => Some(Demo::Keypad),
        Keycode::Num7 | Keycode::Kp7 => Some(Demo::Choice),
        Keycode::Num8 | Keycode::Kp8 => Some(Demo::BlindReview),
        _ => None,
    }
}

fn new_simulator(profile: Profile) -> Simulator {
    let display = SimulatorDisplay::<Rgb565>::new(Size::new(
        profile.screen_width as u32,
        profile.screen_height as u32,
    ));
    UseCases::new(DisplayFrontend::new(display), profile)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting nbgl-rs simulator");
    info!("Keys: 1=Home 2=Review 3=Streaming 4=Address 5=Spinner 6=Keypad 7=Choice 8=Blind F=Profile Q=Quit");

    let mut profile = Profile::STAX;
    let mut uc = new_simulator(profile);
    let mut demo = Demo::Home;
    if let Err(e) = start(&mut uc, demo) {
        error!("Cannot start: {}", e);
        return;
    }

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("nbgl-rs Simulator", &output_settings);
    // the window must be updated once before polling its events
    window.update(uc.gui().frontend().panel());

    let epoch = Instant::now();
    let mut last_tick = Instant::now();
    let mut finger_down = false;

    'running: loop {
        let frame_start = Instant::now();
        let now_ms = epoch.elapsed().as_millis() as u32;

        // --- SDL events ---------------------------------------------------
        let events: Vec<SimulatorEvent> = window.events().collect();
        for event in events {
            let result = match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                    if keycode == Keycode::F {
                        profile = if profile == Profile::STAX {
                            Profile::FLEX
                        } else {
                            Profile::STAX
                        };
                        uc = new_simulator(profile);
                        window = Window::new("nbgl-rs Simulator", &output_settings);
                        demo = Demo::Home;
                        start(&mut uc, demo).map(|_| None)
                    } else if let Some(target) = keycode_to_demo(keycode) {
                        demo = target;
                        start(&mut uc, demo).map(|_| None)
                    } else {
                        Ok(None)
                    }
                }
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    finger_down = true;
                    uc.on_touch(&TouchSample::pressed(point.x as i16, point.y as i16, now_ms))
                }
                SimulatorEvent::MouseMove { point } if finger_down => {
                    uc.on_touch(&TouchSample::pressed(point.x as i16, point.y as i16, now_ms))
                }
                SimulatorEvent::MouseButtonUp { point, .. } => {
                    finger_down = false;
                    uc.on_touch(&TouchSample::released(point.x as i16, point.y as i16, now_ms))
                }
                _ => Ok(None),
            };
            let outcome = result.and_then(|event| match event {
                Some(event) => on_event(&mut uc, demo, event),
                None => Ok(demo),
            });
            match outcome {
                Ok(next) => demo = next,
                Err(e) => error!("{:?}: {}", demo, e),
            }
        }

        // --- Tickers ------------------------------------------------------
        let elapsed = embassy_time::Duration::from_millis(last_tick.elapsed().as_millis() as u64);
        last_tick = Instant::now();
        match uc.on_tick(elapsed) {
            Ok(Some(event)) => match on_event(&mut uc, demo, event) {
                Ok(next) => demo = next,
                Err(e) => error!("{:?}: {}", demo, e),
            },
            Ok(None) => {}
            Err(e) => error!("Tick: {}", e),
        }

        window.update(uc.gui().frontend().panel());

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
