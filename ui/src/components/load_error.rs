use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadErrorProps {
    pub message: AttrValue,
    pub on_retry: Callback<()>,
}

/// A blocking load error with a retry button.
#[function_component]
pub fn LoadError(props: &LoadErrorProps) -> Html {
    let on_click = props.on_retry.reform(|_: MouseEvent| ());
    html! {
        <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border \
                    border-red-200 dark:border-red-800 flex items-center \
                    justify-between gap-4">
            <p class="text-sm text-red-700 dark:text-red-400">
                {&props.message}
            </p>
            <button
                onclick={on_click}
                class="px-3 py-1 text-sm font-medium text-red-700 \
                       dark:text-red-300 border border-red-300 \
                       dark:border-red-700 rounded-md hover:bg-red-100 \
                       dark:hover:bg-red-900/40"
            >
                {"Retry"}
            </button>
        </div>
    }
}
