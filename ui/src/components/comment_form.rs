use payloads::ErrorInfo;
use payloads::requests::COMMENT_MAX_LEN;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

/// Text to post and a callback reporting how posting went. On `Ok` the
/// form clears; on `Err` it keeps the text and shows the error.
pub type Submission = (String, Callback<Result<(), ErrorInfo>>);

#[derive(Properties, PartialEq)]
pub struct CommentFormProps {
    pub on_submit: Callback<Submission>,
    #[prop_or_default]
    pub on_cancel: Option<Callback<()>>,
    #[prop_or_default]
    pub initial: AttrValue,
    #[prop_or_else(|| AttrValue::from("Write a comment..."))]
    pub placeholder: AttrValue,
    #[prop_or_else(|| AttrValue::from("Post comment"))]
    pub submit_label: AttrValue,
}

#[function_component]
pub fn CommentForm(props: &CommentFormProps) -> Html {
    let content = {
        let initial = props.initial.to_string();
        use_state(move || initial)
    };
    let error = use_state(|| None::<ErrorInfo>);
    let submitting = use_state(|| false);

    let on_input = {
        let content = content.clone();
        Callback::from(move |e: InputEvent| {
            let textarea: HtmlTextAreaElement = e.target_unchecked_into();
            content.set(textarea.value());
        })
    };

    let on_submit = {
        let content = content.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let on_submit = props.on_submit.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            submitting.set(true);
            error.set(None);

            let done = {
                let content = content.clone();
                let error = error.clone();
                let submitting = submitting.clone();
                Callback::from(move |result: Result<(), ErrorInfo>| {
                    submitting.set(false);
                    match result {
                        Ok(()) => content.set(String::new()),
                        Err(e) => error.set(Some(e)),
                    }
                })
            };
            on_submit.emit(((*content).clone(), done));
        })
    };

    // Prefer the server's message for the field over the generic one
    let message = (*error).as_ref().map(|e| {
        e.field_errors()
            .remove("content")
            .unwrap_or_else(|| e.message.clone())
    });
    let length = content.chars().count();

    html! {
        <form onsubmit={on_submit} class="space-y-2">
            <textarea
                value={(*content).clone()}
                oninput={on_input}
                placeholder={props.placeholder.clone()}
                rows="3"
                disabled={*submitting}
                class="w-full px-3 py-2 border border-neutral-300 \
                       dark:border-neutral-600 rounded-md bg-white \
                       dark:bg-neutral-700 text-neutral-900 \
                       dark:text-neutral-100 focus:outline-none \
                       focus:ring-2 focus:ring-neutral-500"
            />
            if let Some(message) = message {
                <p class="text-sm text-red-600 dark:text-red-400">{message}</p>
            }
            <div class="flex items-center justify-between">
                <span class={classes!(
                    "text-xs",
                    if length > COMMENT_MAX_LEN {
                        "text-red-600 dark:text-red-400"
                    } else {
                        "text-neutral-500 dark:text-neutral-400"
                    }
                )}>
                    {format!("{length}/{COMMENT_MAX_LEN}")}
                </span>
                <div class="flex gap-2">
                    if let Some(on_cancel) = &props.on_cancel {
                        <button
                            type="button"
                            onclick={on_cancel.reform(|_: MouseEvent| ())}
                            class="px-3 py-1 text-sm text-neutral-700 \
                                   dark:text-neutral-300 hover:underline"
                        >
                            {"Cancel"}
                        </button>
                    }
                    <button
                        type="submit"
                        disabled={*submitting || content.trim().is_empty()}
                        class="px-4 py-1 text-sm font-medium rounded-md \
                               bg-neutral-900 dark:bg-white text-white \
                               dark:text-neutral-900 disabled:opacity-50"
                    >
                        {if *submitting { "Posting..." } else { props.submit_label.as_str() }}
                    </button>
                </div>
            </div>
        </form>
    }
}
