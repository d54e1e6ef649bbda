use payloads::{Comment, CommentStatus, ErrorInfo, VoteDirection};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::{
    CommentForm, ReportDialog, Submission, TimestampDisplay,
};
use crate::hooks::SectionHandle;

#[derive(Properties, PartialEq)]
pub struct CommentItemProps {
    pub section: SectionHandle,
    pub comment: Comment,
    /// 0 for root comments
    pub depth: usize,
}

/// Which inline panel is open under a comment.
#[derive(Clone, Copy, PartialEq)]
enum Panel {
    None,
    Reply,
    Edit,
    Report,
}

/// Forward a section call's outcome to a form's `done` callback.
fn settle<T>(
    done: Callback<Result<(), ErrorInfo>>,
    result: Result<T, ErrorInfo>,
) {
    done.emit(result.map(|_| ()));
}

#[function_component]
pub fn CommentItem(props: &CommentItemProps) -> Html {
    let panel = use_state(|| Panel::None);
    let section = &props.section;
    let comment = &props.comment;
    let id = comment.id;

    let open = |target: Panel| {
        let panel = panel.clone();
        Callback::from(move |_: MouseEvent| {
            panel.set(if *panel == target { Panel::None } else { target });
        })
    };
    let close = {
        let panel = panel.clone();
        Callback::from(move |_: ()| panel.set(Panel::None))
    };

    let on_vote = |direction: VoteDirection| {
        let section = section.section.clone();
        Callback::from(move |_: MouseEvent| {
            let section = section.clone();
            spawn_local(async move {
                let _ = section.vote(id, direction).await;
            });
        })
    };

    let on_moderate = |status: CommentStatus| {
        let section = section.section.clone();
        Callback::from(move |_: MouseEvent| {
            let section = section.clone();
            spawn_local(async move {
                let _ = section.moderate(id, status).await;
            });
        })
    };

    let on_delete = {
        let section = section.section.clone();
        Callback::from(move |_: MouseEvent| {
            let confirmed = web_sys::window()
                .and_then(|window| {
                    window
                        .confirm_with_message("Delete this comment?")
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let section = section.clone();
            spawn_local(async move {
                let _ = section.delete(id).await;
            });
        })
    };

    let on_reply = {
        let section = section.section.clone();
        let panel = panel.clone();
        Callback::from(move |(content, done): Submission| {
            let section = section.clone();
            let panel = panel.clone();
            spawn_local(async move {
                let result = section.reply(id, &content).await;
                let posted = result.is_ok();
                settle(done, result);
                if posted {
                    panel.set(Panel::None);
                }
            });
        })
    };

    let on_edit = {
        let section = section.section.clone();
        let panel = panel.clone();
        Callback::from(move |(content, done): Submission| {
            let section = section.clone();
            let panel = panel.clone();
            spawn_local(async move {
                let result = section.edit(id, &content).await;
                let saved = result.is_ok();
                settle(done, result);
                if saved {
                    panel.set(Panel::None);
                }
            });
        })
    };

    let on_report = {
        let section = section.section.clone();
        Callback::from(move |(reason, done): Submission| {
            let section = section.clone();
            spawn_local(async move {
                settle(done, section.report(id, &reason).await);
            });
        })
    };

    let max_depth = section.config().max_depth;
    let indent = if props.depth > 0 && props.depth <= max_depth {
        "ml-6 pl-4 border-l border-neutral-200 dark:border-neutral-700"
    } else {
        ""
    };

    let vote_class = |direction: VoteDirection| {
        if comment.user_vote == Some(direction) {
            "font-semibold text-neutral-900 dark:text-white"
        } else {
            "text-neutral-500 dark:text-neutral-400 hover:text-neutral-900 \
             dark:hover:text-white"
        }
    };

    let status_badge = match comment.status {
        CommentStatus::Approved => html! {},
        status => html! {
            <span class="px-2 py-0.5 text-xs rounded-full bg-yellow-100 \
                         dark:bg-yellow-900/30 text-yellow-800 \
                         dark:text-yellow-300">
                {status.to_string()}
            </span>
        },
    };

    let action_class = "text-neutral-500 dark:text-neutral-400 \
                        hover:text-neutral-900 dark:hover:text-white";

    html! {
        <div class={classes!("mt-4", indent)}>
            <div class="flex items-start gap-3">
                <div class="w-8 h-8 flex-shrink-0 rounded-full bg-neutral-200 \
                            dark:bg-neutral-700 flex items-center \
                            justify-center text-sm font-medium">
                    {comment.author.initial().to_string()}
                </div>
                <div class="flex-1 min-w-0">
                    <div class="flex items-center gap-2 text-sm">
                        <span class="font-medium text-neutral-900 dark:text-neutral-100">
                            {comment.author.display_name()}
                        </span>
                        <span class="text-neutral-500 dark:text-neutral-400">
                            <TimestampDisplay timestamp={comment.created_at} />
                        </span>
                        if comment.is_edited() {
                            <span class="text-xs text-neutral-400">{"(edited)"}</span>
                        }
                        {status_badge}
                    </div>

                    if *panel == Panel::Edit {
                        <div class="mt-2">
                            <CommentForm
                                on_submit={on_edit}
                                on_cancel={close.clone()}
                                initial={comment.content.clone()}
                                submit_label="Save"
                            />
                        </div>
                    } else {
                        <p class="mt-1 text-neutral-800 dark:text-neutral-200 whitespace-pre-wrap">
                            {&comment.content}
                        </p>
                    }

                    <div class="mt-2 flex items-center gap-4 text-sm">
                        <button
                            onclick={on_vote(VoteDirection::Up)}
                            class={vote_class(VoteDirection::Up)}
                            aria-label="Upvote"
                        >
                            {format!("▲ {}", comment.upvotes)}
                        </button>
                        <button
                            onclick={on_vote(VoteDirection::Down)}
                            class={vote_class(VoteDirection::Down)}
                            aria-label="Downvote"
                        >
                            {format!("▼ {}", comment.downvotes)}
                        </button>
                        if section.can_reply(id) {
                            <button onclick={open(Panel::Reply)} class={action_class}>
                                {"Reply"}
                            </button>
                        }
                        if section.can_edit(comment) {
                            <button onclick={open(Panel::Edit)} class={action_class}>
                                {"Edit"}
                            </button>
                        }
                        if section.can_delete(comment) {
                            <button onclick={on_delete} class={action_class}>
                                {"Delete"}
                            </button>
                        }
                        if section.can_report(comment) {
                            <button onclick={open(Panel::Report)} class={action_class}>
                                {"Report"}
                            </button>
                        }
                        if section.can_moderate() {
                            if comment.status != CommentStatus::Approved {
                                <button
                                    onclick={on_moderate(CommentStatus::Approved)}
                                    class="text-green-700 dark:text-green-400 hover:underline"
                                >
                                    {"Approve"}
                                </button>
                            }
                            if comment.status != CommentStatus::Rejected {
                                <button
                                    onclick={on_moderate(CommentStatus::Rejected)}
                                    class="text-red-700 dark:text-red-400 hover:underline"
                                >
                                    {"Reject"}
                                </button>
                            }
                        }
                    </div>

                    if *panel == Panel::Reply {
                        <div class="mt-3">
                            <CommentForm
                                on_submit={on_reply}
                                on_cancel={close.clone()}
                                placeholder="Write a reply..."
                                submit_label="Reply"
                            />
                        </div>
                    }
                    if *panel == Panel::Report {
                        <ReportDialog on_submit={on_report} on_close={close} />
                    }
                </div>
            </div>

            {for section.replies(id).into_iter().map(|reply| html! {
                <CommentItem
                    key={reply.id.to_string()}
                    section={section.clone()}
                    comment={reply.clone()}
                    depth={props.depth + 1}
                />
            })}
        </div>
    }
}
