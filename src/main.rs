//! Terminal lobby demo (default binary).
//!
//! A two-screen application wired through the whole runtime: a login
//! screen where a nickname is typed and a lobby listing joined players.
//! The router picks the screen, the store holds nickname and player
//! list, the event bus carries join announcements, and every state
//! change re-renders the current route through the diffing renderer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};

use tuidom::app::{EventBus, Router, State, Store, WILDCARD};
use tuidom::core::{el, Document, VNode};
use tuidom::input::{is_interrupt, InputEvents};
use tuidom::render::Renderer;
use tuidom::term::{DocumentView, FrameBuffer, TerminalRenderer};
use tuidom::types::{EventKind, KeyPress};

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let doc = Document::new();
    let root = doc.create_element("div");
    let renderer = Rc::new(RefCell::new(Renderer::new(doc.clone())));

    let store = Store::new(initial_state());
    let router = Router::new();
    let bus = EventBus::new();
    let input = InputEvents::new();
    let quit = Rc::new(Cell::new(false));

    // Routes render their screen into the shared root.
    {
        let (r, target) = (renderer.clone(), root.clone());
        router.add_route("/", move |store| {
            r.borrow_mut().render(&login_view(store), &target);
        });
        let (r, target) = (renderer.clone(), root.clone());
        router.add_route("/lobby", move |store| {
            r.borrow_mut().render(&lobby_view(store), &target);
        });
        let (r, target) = (renderer.clone(), root.clone());
        router.add_route(WILDCARD, move |store| {
            r.borrow_mut().render(&login_view(store), &target);
        });
    }

    // Any state change re-renders whatever route is current.
    let _rerender = {
        let router = router.clone();
        store.subscribe(move |_| router.navigate(&router.current_path()))
    };

    // Join announcements land in the player list.
    let _joined = {
        let store = store.clone();
        bus.on("player-joined", move |name| {
            let mut players = store
                .get("players")
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            players.push(name.clone());
            store.set("players", Value::Array(players));
        })
    };

    let _keys = {
        let (store, router, bus, quit) = (store.clone(), router.clone(), bus.clone(), quit.clone());
        input.listen(EventKind::KeyDown, move |ev| {
            let Some(press) = ev.key() else { return };
            if press.key == "Escape" || is_interrupt(press) {
                quit.set(true);
                return;
            }
            match router.current_path().as_str() {
                "/lobby" => {
                    if press.key == "Backspace" {
                        router.navigate("/");
                    }
                }
                _ => handle_login_key(press, &store, &bus, &router),
            }
        })
    };

    router.init(store);

    let view = DocumentView::default();
    let mut fb = FrameBuffer::new(0, 0);
    while !quit.get() {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        fb.resize(w, h);
        view.paint(&root, &mut fb);
        term.present(&fb)?;

        input.pump(Duration::from_millis(50))?;
    }
    Ok(())
}

fn initial_state() -> State {
    let mut state = State::new();
    state.insert("nickname".to_string(), json!(""));
    state.insert("players".to_string(), json!([]));
    state
}

fn handle_login_key(press: &KeyPress, store: &Store, bus: &EventBus, router: &Router) {
    let nickname = field_str(store, "nickname");
    match press.key.as_str() {
        "Enter" => {
            if !nickname.is_empty() {
                bus.emit("player-joined", &json!(nickname));
                router.navigate("/lobby");
            }
        }
        "Backspace" => {
            let mut nickname = nickname;
            nickname.pop();
            store.set("nickname", json!(nickname));
        }
        "Space" => {
            store.set("nickname", json!(nickname + " "));
        }
        key => {
            if key.chars().count() == 1 && !press.ctrl && !press.alt {
                store.set("nickname", json!(nickname + key));
            }
        }
    }
}

fn field_str(store: &Store, field: &str) -> String {
    store
        .get(field)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn login_view(store: &Store) -> VNode {
    let nickname = field_str(store, "nickname");
    el("div")
        .child(el("h1").attr("fg", "cyan").child("tuidom"))
        .child(el("p").child("Type a nickname and press Enter to join."))
        .child(
            el("p")
                .child(el("label").child("nickname: "))
                .child(el("input").attr("value", nickname)),
        )
        .child(el("small").attr("fg", "gray").child("Esc quits"))
        .into()
}

fn lobby_view(store: &Store) -> VNode {
    let players: Vec<String> = store
        .get("players")
        .and_then(|v| v.as_array().cloned())
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    el("div")
        .child(el("h1").attr("fg", "green").child("lobby"))
        .child(el("p").child(format!("{} player(s) joined:", players.len())))
        .child(
            el("ul").children(
                players
                    .iter()
                    .map(|p| el("li").key(p.clone()).child(p.clone())),
            ),
        )
        .child(el("small").attr("fg", "gray").child("Backspace leaves, Esc quits"))
        .into()
}
