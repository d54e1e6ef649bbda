use std::collections::BTreeMap;

use fetch_state::PagerOptions;
use payloads::Article;
use payloads::requests::PageQuery;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{
    LoadError, NewsletterForm, PaginationControls, TimestampDisplay,
};
use crate::hooks::{use_api, use_paginated_fetch};

const TAG_FILTER: &str = "tag";

#[function_component]
pub fn HomePage() -> Html {
    let api = use_api();
    let articles = use_paginated_fetch(
        (),
        PageQuery::default(),
        move |query: PageQuery| {
            let api = api.clone();
            async move { api.list_articles(&query).await }
        },
        PagerOptions::<Article>::default(),
    );

    let filter_by_tag = |tag: String| {
        let update_filters = articles.update_filters.clone();
        Callback::from(move |_: MouseEvent| {
            update_filters
                .emit(BTreeMap::from([(TAG_FILTER.to_string(), tag.clone())]));
        })
    };
    let active_tag = articles.params.filters.get(TAG_FILTER).cloned();
    let state = &articles.state;

    let list = if state.is_initial_loading() {
        html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"Loading articles..."}</p>
        }
    } else if let Some(error) = &state.error {
        html! {
            <LoadError
                message={format!("Error loading articles: {error}")}
                on_retry={articles.refetch.clone()}
            />
        }
    } else if state.items().is_empty() {
        html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"No articles yet."}</p>
        }
    } else {
        state
            .items()
            .iter()
            .map(|article| {
                html! {
                    <article key={article.id.to_string()} class="py-6">
                        <Link<Route>
                            to={Route::Article { id: article.id.0 }}
                            classes="text-xl font-semibold text-neutral-900 \
                                     dark:text-neutral-100 hover:underline"
                        >
                            {&article.title}
                        </Link<Route>>
                        <div class="mt-1 text-sm text-neutral-500 dark:text-neutral-400 flex gap-2">
                            if let Some(author) = &article.author {
                                <span>{author.display_name()}</span>
                            }
                            <TimestampDisplay timestamp={article.created_at} />
                            <span>{format!("{} comments", article.comment_count)}</span>
                        </div>
                        if let Some(excerpt) = &article.excerpt {
                            <p class="mt-2 text-neutral-700 dark:text-neutral-300">
                                {excerpt}
                            </p>
                        }
                        <div class="mt-2 flex gap-2">
                            {for article.tags.iter().map(|tag| html! {
                                <button
                                    onclick={filter_by_tag(tag.clone())}
                                    class="px-2 py-0.5 text-xs rounded-full \
                                           bg-neutral-100 dark:bg-neutral-800 \
                                           text-neutral-700 dark:text-neutral-300"
                                >
                                    {format!("#{tag}")}
                                </button>
                            })}
                        </div>
                    </article>
                }
            })
            .collect::<Html>()
    };

    let clear_tag = {
        let update_filters = articles.update_filters.clone();
        Callback::from(move |_: MouseEvent| {
            // An empty value clears the filter
            update_filters
                .emit(BTreeMap::from([(TAG_FILTER.to_string(), String::new())]));
        })
    };

    html! {
        <div>
            <div class="flex items-center justify-between mb-4">
                <h1 class="text-3xl font-bold text-neutral-900 dark:text-white">
                    {"Articles"}
                </h1>
                if let Some(tag) = active_tag {
                    <button onclick={clear_tag} class="text-sm underline">
                        {format!("#{tag} ✕")}
                    </button>
                }
            </div>
            <div class="divide-y divide-neutral-200 dark:divide-neutral-700">
                {list}
            </div>
            <PaginationControls
                pagination={state.pagination}
                on_page_change={articles.change_page.clone()}
                is_loading={state.loading}
            />
            <NewsletterForm />
        </div>
    }
}
