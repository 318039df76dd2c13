use crate::{
    dom::{test_ids, Element, ACTIVE_ICON_CLASS},
    routes::Route,
};

/// Side navigation shared by the employee pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub window_icon: Element,
    pub mail_icon: Element,
    pub markup: String,
}

pub fn vertical_layout(active: Route) -> Layout {
    let mut window_icon = Element::new(test_ids::ICON_WINDOW);
    let mut mail_icon = Element::new(test_ids::ICON_MAIL);
    match active {
        Route::Bills => window_icon.add_class(ACTIVE_ICON_CLASS),
        Route::NewBill => mail_icon.add_class(ACTIVE_ICON_CLASS),
        Route::Login => {}
    }

    let markup = format!(
        r#"<div class="vertical-navbar">
  <div class="layout-title">Billed</div>
  <div id="layout-icon1" data-testid="{}" class="{}">window</div>
  <div id="layout-icon2" data-testid="{}" class="{}">mail</div>
</div>"#,
        window_icon.test_id(),
        window_icon.class_list(),
        mail_icon.test_id(),
        mail_icon.class_list(),
    );

    Layout {
        window_icon,
        mail_icon,
        markup,
    }
}
