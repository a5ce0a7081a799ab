use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};

use crate::engine::ViewModel;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    View(ViewModel),
    Resize,
}

/// Merges terminal input with view-model updates from the controller.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(mut views: watch::Receiver<ViewModel>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut views_open = true;

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    changed = views.changed(), if views_open => {
                        if changed.is_err() {
                            views_open = false;
                            continue;
                        }
                        let view = views.borrow_and_update().clone();
                        if tx.send(Event::View(view)).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
