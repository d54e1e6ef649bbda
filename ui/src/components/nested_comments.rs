use comment_thread::{SortOrder, StatusFilter, ThreadConfig};
use payloads::{ArticleId, Comment, ErrorInfo};
use web_sys::HtmlSelectElement;
use yew::platform::spawn_local;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::components::{CommentForm, CommentItem, LoadError, Submission};
use crate::hooks::use_comment_section;
use crate::State;

#[derive(Properties, PartialEq)]
pub struct NestedCommentsProps {
    pub article_id: ArticleId,
    /// The loaded page of comments, flat or pre-nested.
    pub comments: Vec<Comment>,
    #[prop_or(false)]
    pub loading: bool,
    #[prop_or_default]
    pub error: Option<ErrorInfo>,
    pub on_retry: Callback<()>,
    #[prop_or_default]
    pub config: ThreadConfig,
}

/// The comment thread under an article: controls, the new-comment form
/// and every visible root comment with its replies.
#[function_component]
pub fn NestedComments(props: &NestedCommentsProps) -> Html {
    let (state, _) = use_store::<State>();
    let section = use_comment_section(props.article_id, props.config.clone());

    // Each freshly loaded page replaces the working collection
    {
        let section = section.section.clone();
        use_effect_with(props.comments.clone(), move |comments| {
            section.replace_comments(comments.clone());
        });
    }

    let on_sort = {
        let section = section.section.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(sort) = SortOrder::from_value(&select.value()) {
                section.set_sort(sort);
            }
        })
    };

    let on_filter = {
        let section = section.section.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(filter) = StatusFilter::from_value(&select.value()) {
                section.set_filter(filter);
            }
        })
    };

    let on_dismiss = {
        let section = section.section.clone();
        Callback::from(move |_: MouseEvent| section.dismiss_error())
    };

    let on_create = {
        let section = section.section.clone();
        Callback::from(move |(content, done): Submission| {
            let section = section.clone();
            spawn_local(async move {
                done.emit(section.create(&content).await.map(|_| ()));
            });
        })
    };

    let count = section.visible_count();
    let select_class = "px-2 py-1 text-sm border border-neutral-300 \
                        dark:border-neutral-600 rounded-md bg-white \
                        dark:bg-neutral-700";

    let body = if let Some(error) = &props.error {
        html! {
            <LoadError
                message={format!("Error loading comments: {error}")}
                on_retry={props.on_retry.clone()}
            />
        }
    } else if props.loading && section.comments().is_empty() {
        html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"Loading comments..."}
            </p>
        }
    } else {
        let roots = section.top_level();
        if roots.is_empty() {
            html! {
                <p class="text-neutral-600 dark:text-neutral-400">
                    {"No comments yet. Be the first to comment!"}
                </p>
            }
        } else {
            html! {
                {for roots.into_iter().map(|comment| html! {
                    <CommentItem
                        key={comment.id.to_string()}
                        section={section.clone()}
                        comment={comment.clone()}
                        depth={0}
                    />
                })}
            }
        }
    };

    html! {
        <section class="mt-12">
            <div class="flex flex-wrap items-center justify-between gap-4 mb-6">
                <h2 class="text-2xl font-semibold text-neutral-900 dark:text-neutral-100">
                    {format!("Comments ({count})")}
                </h2>
                <div class="flex gap-2">
                    <select onchange={on_sort} class={select_class} aria-label="Sort comments">
                        {for SortOrder::ALL.into_iter().map(|order| html! {
                            <option
                                value={order.to_string()}
                                selected={order == section.sort()}
                            >
                                {order.label()}
                            </option>
                        })}
                    </select>
                    <select onchange={on_filter} class={select_class} aria-label="Filter comments">
                        {for StatusFilter::ALL.into_iter().map(|filter| html! {
                            <option
                                value={filter.to_string()}
                                selected={filter == section.filter()}
                            >
                                {filter.label()}
                            </option>
                        })}
                    </select>
                </div>
            </div>

            if let Some(error) = section.action_error() {
                <div class="mb-4 p-3 rounded-md bg-red-50 dark:bg-red-900/20 \
                            border border-red-200 dark:border-red-800 flex \
                            items-center justify-between gap-4">
                    <p class="text-sm text-red-700 dark:text-red-400">
                        {error.message}
                    </p>
                    <button
                        onclick={on_dismiss}
                        aria-label="Dismiss"
                        class="text-red-700 dark:text-red-300 hover:underline text-sm"
                    >
                        {"Dismiss"}
                    </button>
                </div>
            }

            <div class="mb-8">
                if state.is_authenticated() {
                    <CommentForm on_submit={on_create} />
                } else {
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                        {"Log in to join the discussion."}
                    </p>
                }
            </div>

            {body}
        </section>
    }
}
