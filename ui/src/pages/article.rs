use fetch_state::{FetchOptions, PagerOptions};
use payloads::requests::PageQuery;
use payloads::{Article, ArticleId, Comment};
use yew::prelude::*;

use crate::components::{NestedComments, PaginationControls, TimestampDisplay};
use crate::config::UiConfig;
use crate::hooks::{use_api, use_fetch, use_paginated_fetch};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: i64,
}

#[function_component]
pub fn ArticlePage(props: &Props) -> Html {
    let article_id = ArticleId(props.id);
    let api = use_api();

    let article = {
        let api = api.clone();
        use_fetch(
            article_id,
            move |_: ()| {
                let api = api.clone();
                async move { api.get_article(article_id).await }
            },
            FetchOptions::<Article>::default(),
        )
    };

    let comments = use_paginated_fetch(
        article_id,
        UiConfig::get().comments_query(),
        move |query: PageQuery| {
            let api = api.clone();
            async move { api.list_comments(article_id, &query).await }
        },
        PagerOptions::<Comment>::default(),
    );

    let body = article.render("article", |article, _, _| {
        html! {
            <article>
                <h1 class="text-3xl font-bold text-neutral-900 dark:text-white">
                    {&article.title}
                </h1>
                <div class="mt-2 text-sm text-neutral-500 dark:text-neutral-400 flex gap-2">
                    if let Some(author) = &article.author {
                        <span>{author.display_name()}</span>
                    }
                    <TimestampDisplay timestamp={article.created_at} />
                </div>
                if let Some(content) = &article.content {
                    <div class="mt-6 text-neutral-800 dark:text-neutral-200 whitespace-pre-wrap">
                        {content}
                    </div>
                }
            </article>
        }
    });

    html! {
        <div>
            {body}
            <NestedComments
                {article_id}
                comments={comments.state.items().to_vec()}
                loading={comments.state.loading}
                error={comments.state.error.clone()}
                on_retry={comments.refetch.clone()}
                config={UiConfig::get().thread_config()}
            />
            <PaginationControls
                pagination={comments.state.pagination}
                on_page_change={comments.change_page.clone()}
                is_loading={comments.state.loading}
            />
        </div>
    }
}
