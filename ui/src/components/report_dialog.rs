use comment_thread::validate;
use payloads::ErrorInfo;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::components::{Modal, Submission};

#[derive(Properties, PartialEq)]
pub struct ReportDialogProps {
    /// Receives the reason; the dialog closes itself on `Ok`.
    pub on_submit: Callback<Submission>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn ReportDialog(props: &ReportDialogProps) -> Html {
    let reason = use_state(String::new);
    let error = use_state(|| None::<ErrorInfo>);
    let submitting = use_state(|| false);

    let on_input = {
        let reason = reason.clone();
        Callback::from(move |e: InputEvent| {
            let textarea: HtmlTextAreaElement = e.target_unchecked_into();
            reason.set(textarea.value());
        })
    };

    let on_submit = {
        let reason = reason.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let on_submit = props.on_submit.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(e) = validate::report_reason(&reason) {
                error.set(Some(e));
                return;
            }
            submitting.set(true);
            error.set(None);

            let done = {
                let error = error.clone();
                let submitting = submitting.clone();
                let on_close = on_close.clone();
                Callback::from(move |result: Result<(), ErrorInfo>| {
                    submitting.set(false);
                    match result {
                        Ok(()) => on_close.emit(()),
                        Err(e) => error.set(Some(e)),
                    }
                })
            };
            on_submit.emit(((*reason).clone(), done));
        })
    };

    html! {
        <Modal
            title="Report comment"
            on_close={props.on_close.clone()}
            close_on_backdrop={!*submitting}
        >
            <form onsubmit={on_submit} class="space-y-4">
                <textarea
                    value={(*reason).clone()}
                    oninput={on_input}
                    placeholder="Why should moderators look at this comment?"
                    rows="4"
                    disabled={*submitting}
                    class="w-full px-3 py-2 border border-neutral-300 \
                           dark:border-neutral-600 rounded-md bg-white \
                           dark:bg-neutral-700 text-neutral-900 \
                           dark:text-neutral-100"
                />
                if let Some(error) = &*error {
                    <p class="text-sm text-red-600 dark:text-red-400">
                        {&error.message}
                    </p>
                }
                <div class="flex justify-end gap-2">
                    <button
                        type="button"
                        onclick={props.on_close.reform(|_: MouseEvent| ())}
                        disabled={*submitting}
                        class="px-4 py-2 text-sm text-neutral-700 \
                               dark:text-neutral-300 hover:underline"
                    >
                        {"Cancel"}
                    </button>
                    <button
                        type="submit"
                        disabled={*submitting}
                        class="px-4 py-2 text-sm font-medium rounded-md \
                               bg-red-600 text-white hover:bg-red-700 \
                               disabled:opacity-50"
                    >
                        {if *submitting { "Reporting..." } else { "Report" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}
