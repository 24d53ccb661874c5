//! Kanban Page
//!
//! Pipeline board. A drop moves the card at once; the server either confirms
//! the move or the board is reloaded from it.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_handlers, create_dnd_signals, DropTarget};
use leptos_router::hooks::use_navigate;
use reactive_stores::Store;

use crate::components::KanbanColumn;
use crate::context::{use_auth, use_notifier};
use crate::kanban::{fetch_board, settle, Board, Settlement};

#[component]
pub fn KanbanPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let navigate = use_navigate();

    let board = Store::new(Board::default());
    let loaded = RwSignal::new(false);
    let load_error = RwSignal::new(None::<String>);
    let dnd = create_dnd_signals();

    let load = move || {
        let client = auth.client();
        load_error.set(None);
        spawn_local(async move {
            match fetch_board(&client).await {
                Ok(server) => {
                    board.write().replace(server);
                    loaded.set(true);
                }
                Err(err) => {
                    notifier.api_error(&err);
                    load_error.set(Some(err.message()));
                }
            }
        });
    };
    load();

    bind_global_handlers(dnd, move |card: u32, target: DropTarget| {
        let Some(mv) = board.write().apply_move(card, target.column()) else {
            return;
        };
        let client = auth.client();
        spawn_local(async move {
            let settlement = settle(&client, mv).await;
            match &settlement {
                Settlement::Committed(_) => {}
                Settlement::Reverted { cause, .. } => {
                    notifier.error(format!("Could not move the deal: {}", cause.message()));
                }
                Settlement::Diverged { cause, .. } => {
                    notifier.error(format!("Could not move the deal: {}. Reload the page.", cause.message()));
                }
            }
            board.write().apply_settlement(settlement);
        });
    });

    let on_open = Callback::new(move |id: u32| navigate(&format!("/opportunities/{}", id), Default::default()));
    let stages = move || board.with(|b| b.stages.clone());

    view! {
        <div class="kanban-page" class:dragging=move || dnd.dragging.get().is_some()>
            <div class="page-header">
                <h2>"Pipeline"</h2>
            </div>
            <Show
                when=move || loaded.get()
                fallback=move || match load_error.get() {
                    Some(msg) => view! {
                        <div class="card load-error">
                            <p>{format!("Could not load the pipeline: {}", msg)}</p>
                            <button class="btn" on:click=move |_| load()>"Retry"</button>
                        </div>
                    }
                    .into_any(),
                    None => view! { <div class="page-loading">"Loading..."</div> }.into_any(),
                }
            >
                <div class="kanban-board">
                    <For each=stages key=|s| (s.id, s.name.clone(), s.order) let:stage>
                        <KanbanColumn board=board stage=stage dnd=dnd on_open=on_open/>
                    </For>
                </div>
            </Show>
        </div>
    }
}
