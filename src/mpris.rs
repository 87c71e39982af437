use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use async_io::block_on;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::player::PlaybackState;

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    length_micros: Option<u64>,
    track_id: Option<ObjectPath<'static>>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            s.title = track.map(|t| t.title.clone());
            s.artist = track.and_then(|t| t.artist.clone()).into_iter().collect();
            s.url = track.map(|t| format!("file://{}", t.path.display()));
            s.length_micros = track.and_then(|t| t.duration).map(|d| d.as_micros() as u64);
            s.track_id = index.and_then(track_object_path);
        }
        let _ = self.notify.send(());
    }
}

fn track_object_path(index: usize) -> Option<ObjectPath<'static>> {
    ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{index}")).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "coda"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(ref id) = s.track_id {
            insert_entry(&mut map, "mpris:trackid", Value::from(id.clone()));
        }
        if let Some(ref title) = s.title {
            insert_entry(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert_entry(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(ref url) = s.url {
            insert_entry(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(micros) = s.length_micros {
            insert_entry(&mut map, "mpris:length", Value::from(micros as i64));
        }
        map
    }
}

fn insert_entry(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel();

    let state_for_thread = state.clone();
    std::thread::spawn(move || serve(tx, state_for_thread, notify_rx));

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>, notify_rx: Receiver<()>) {
    block_on(async move {
        let path = "/org/mpris/MediaPlayer2";

        let connection = match Connection::session().await {
            Ok(c) => c,
            Err(e) => {
                log::warn!("mpris: session bus unavailable: {e}");
                return;
            }
        };

        if let Err(e) = connection.request_name("org.mpris.MediaPlayer2.coda").await {
            log::warn!("mpris: could not acquire bus name: {e}");
            return;
        }

        let object_server = connection.object_server();

        if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
            log::warn!("mpris: root interface registration failed: {e}");
            return;
        }

        if let Err(e) = object_server.at(path, PlayerIface { tx, state }).await {
            log::warn!("mpris: player interface registration failed: {e}");
            return;
        }

        let player_ref = match object_server.interface::<_, PlayerIface>(path).await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("mpris: player interface lookup failed: {e}");
                return;
            }
        };

        // Blocks between updates; the connection serves calls from its own
        // executor. Ends when the handle (and its sender) is dropped.
        while notify_rx.recv().is_ok() {
            let iface = player_ref.get().await;
            let emitter = player_ref.signal_emitter();
            let _ = iface.playback_status_changed(emitter).await;
            let _ = iface.metadata_changed(emitter).await;
        }
    });
}
