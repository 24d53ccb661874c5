//! Kanban Column Component
//!
//! One pipeline stage with its cards. Cards drag between columns and open
//! the deal on a plain click.

use leptos::prelude::*;
use leptos_dragdrop::*;
use reactive_stores::Store;

use crate::format;
use crate::kanban::Board;
use crate::models::{Opportunity, PipelineStage};

#[component]
pub fn KanbanColumn(
    board: Store<Board>,
    stage: PipelineStage,
    dnd: DndSignals,
    #[prop(into)] on_open: Callback<u32>,
) -> impl IntoView {
    let stage_id = stage.id;
    let kind = stage.kind;
    let cards = Memo::new(move |_| board.with(|b| b.column(stage_id)));
    let count = move || board.with(|b| b.column_count(stage_id));
    let total = move || format::compact(board.with(|b| b.column_total(stage_id)));

    let on_mouseenter = make_on_column_mouseenter(dnd, stage_id);
    let on_mouseleave = make_on_column_mouseleave(dnd);
    let column_class = move || {
        let mut c = format!("kanban-column {}", kind.css());
        if dnd.is_over_column(stage_id) { c.push_str(" drop-target"); }
        c
    };

    view! {
        <div class=column_class on:mouseenter=on_mouseenter on:mouseleave=on_mouseleave>
            <div class="kanban-column-header">
                <span class="kanban-column-title">{stage.name}</span>
                <span class="kanban-column-count">{count}</span>
                <span class="kanban-column-total">{total}</span>
            </div>
            <div class="kanban-column-body">
                <For
                    each=move || cards.get()
                    key=|o| (o.id, o.stage)
                    let:opportunity
                >
                    <KanbanCard
                        opportunity=opportunity
                        column=stage_id
                        board=board
                        dnd=dnd
                        on_open=on_open
                    />
                </For>
                <Show when=move || count() == 0>
                    <div class="kanban-empty">"No deals"</div>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn KanbanCard(
    opportunity: Opportunity,
    column: u32,
    board: Store<Board>,
    dnd: DndSignals,
    on_open: Callback<u32>,
) -> impl IntoView {
    let id = opportunity.id;
    let on_mousedown = make_on_mousedown(dnd, id);
    let on_mouseenter = make_on_card_mouseenter(dnd, column, id);
    let on_mouseleave = make_on_card_mouseleave(dnd, column);

    let class = move || {
        let mut c = String::from("kanban-card");
        if dnd.is_dragging(id) { c.push_str(" dragging"); }
        if board.with(|b| b.is_pending(id)) { c.push_str(" saving"); }
        c
    };

    view! {
        <div
            class=class
            on:mousedown=on_mousedown
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
            on:click=move |_| {
                if dnd.accepts_click() {
                    on_open.run(id);
                }
            }
        >
            <div class="kanban-card-title">{opportunity.title.clone()}</div>
            <div class="kanban-card-customer">{opportunity.customer_name.clone()}</div>
            <div class="kanban-card-footer">
                <span class="kanban-card-value">{format::currency(opportunity.value)}</span>
                <span class="kanban-card-date">{format::date(opportunity.expected_close_date)}</span>
            </div>
            {(!opportunity.owner_name.is_empty()).then(|| view! {
                <div class="kanban-card-owner">{opportunity.owner_name.clone()}</div>
            })}
        </div>
    }
}
