use std::rc::Rc;

use comment_thread::{CommentSection, ThreadConfig};
use payloads::ArticleId;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::State;
use crate::hooks::use_api;

/// A shared [`CommentSection`] plus a revision that changes whenever the
/// section does, so components holding the handle re-render with it.
#[derive(Clone)]
pub struct SectionHandle {
    pub section: Rc<CommentSection>,
    revision: u64,
}

impl PartialEq for SectionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.section, &other.section)
            && self.revision == other.revision
    }
}

impl std::ops::Deref for SectionHandle {
    type Target = CommentSection;

    fn deref(&self) -> &Self::Target {
        &self.section
    }
}

/// The comment section of `article_id`, kept in step with the signed-in
/// user. A new section replaces the old one when the article changes; the
/// old one is disposed so late results cannot touch it. A write the server
/// rejects with a 401 logs the whole app out.
#[hook]
pub fn use_comment_section(
    article_id: ArticleId,
    config: ThreadConfig,
) -> SectionHandle {
    let api = use_api();
    let (state, dispatch) = use_store::<State>();
    let update = use_force_update();
    let revision = use_mut_ref(|| 0u64);
    let user = state.current_user().cloned();

    let section = {
        let revision = revision.clone();
        let user = user.clone();
        use_memo(article_id, move |article_id| {
            let section = CommentSection::new(api, *article_id, user, config);
            section.subscribe(move || {
                *revision.borrow_mut() += 1;
                update.force_update();
            });
            section.on_session_expired(move || {
                dispatch.reduce_mut(|state| state.logout());
            });
            section
        })
    };

    {
        let section = section.clone();
        use_effect_with(user, move |user| section.set_user(user.clone()));
    }

    {
        let section = section.clone();
        use_effect_with(article_id, move |_| move || section.dispose());
    }

    let revision = *revision.borrow();
    SectionHandle { section, revision }
}
