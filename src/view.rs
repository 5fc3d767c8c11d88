use iced::widget::{
    button, column, container, horizontal_space, pick_list, progress_bar, row, scrollable, text,
    text_input,
};
use iced::{alignment, Element, Length};

use crate::controller::{AppState, Event, Operation};
use crate::document::Document;
use crate::render;
use crate::status::{self, Status};
use crate::Message;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn on(event: Event) -> Message {
    Message::App(event)
}

pub fn page(state: &AppState, frame: usize) -> Element<'_, Message> {
    let header = column![
        text("PDF Summary App").size(32),
        text("Summarize & ask questions on your PDFs").size(15),
    ]
    .spacing(6)
    .width(Length::Fill)
    .align_x(alignment::Horizontal::Center);

    let library = column![upload_panel(state), document_picker(state, frame)]
        .spacing(24)
        .width(Length::FillPortion(1));

    let body = row![
        library,
        summary_panel(state).width(Length::FillPortion(1)),
        qa_panel(state).width(Length::FillPortion(1)),
    ]
    .spacing(32);

    let mut content = column![header].spacing(20).padding(24);
    if let Some(bar) = status_bar(state, frame) {
        content = content.push(bar);
    }
    content = content.push(body);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn status_bar(state: &AppState, frame: usize) -> Option<Element<'_, Message>> {
    let line = match status::for_state(state)? {
        Status::Error(message) => text(format!("Error: {}", message)).style(text::danger),
        Status::Busy(label) => text(format!("{} {}", SPINNER[frame % SPINNER.len()], label)),
        Status::Info(message) => text(message).style(text::success),
    };
    Some(
        container(line.size(15))
            .padding([10, 18])
            .width(Length::Fill)
            .style(container::rounded_box)
            .into(),
    )
}

/// Drop target, pending file, path picker and progress bar.
fn upload_panel(state: &AppState) -> Element<'_, Message> {
    let prompt: Element<'_, Message> = match &state.pending_file {
        Some(file) => {
            let mut remove = button(text("Remove").size(14)).padding([4, 12]);
            if !state.is_loading() {
                remove = remove.on_press(on(Event::RemoveFile));
            }
            row![
                text(render::truncate_to_width(&file.name, 40).into_owned()).size(16),
                horizontal_space(),
                remove,
            ]
            .spacing(12)
            .align_y(alignment::Vertical::Center)
            .into()
        }
        None => column![
            text("Drag & drop a PDF here").size(18),
            text("or enter its path below").size(14),
        ]
        .spacing(4)
        .align_x(alignment::Horizontal::Center)
        .into(),
    };

    let mut picker = text_input("/path/to/document.pdf", &state.picker_input)
        .padding(8)
        .size(14);
    if state.can_choose_file() {
        picker = picker
            .on_input(|value| on(Event::PickerPathChanged(value)))
            .on_submit(on(Event::PickerSubmitted));
    }

    let mut panel = column![prompt, picker]
        .spacing(12)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center);

    if state.upload_progress > 0 {
        panel = panel.push(
            column![
                progress_bar(0.0..=100.0, state.upload_progress as f32).height(10),
                text(format!("{}%", state.upload_progress)).size(13),
            ]
            .spacing(2),
        );
    }

    if state.pending_file.is_some() {
        panel = panel.push(
            button(text("Upload").size(16))
                .padding([10, 32])
                .on_press_maybe(state.can_upload().then(|| on(Event::ConfirmUpload))),
        );
    }

    let zone = container(panel).padding(24).width(Length::Fill);
    if state.drag_active {
        zone.style(container::bordered_box).into()
    } else {
        zone.style(container::rounded_box).into()
    }
}

fn document_picker(state: &AppState, frame: usize) -> Element<'_, Message> {
    let select = pick_list(
        state.documents.as_slice(),
        state.active.as_ref(),
        |doc: Document| on(Event::SelectDocument(Some(doc.id))),
    )
    .placeholder("-- Choose --")
    .width(Length::Fill);

    let clear = button(text("Clear").size(14))
        .padding([6, 12])
        .on_press_maybe(state.active.is_some().then(|| on(Event::SelectDocument(None))));

    let summarizing = state.in_flight == Some(Operation::Summarize);
    let label = if summarizing {
        SPINNER[frame % SPINNER.len()]
    } else {
        "Summarize"
    };
    let summarize = button(
        container(text(label).size(20))
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    )
    .padding([14, 0])
    .width(Length::Fill)
    .on_press_maybe(state.can_summarize().then(|| on(Event::Summarize)));

    let mut panel = column![
        text("Select PDF:").size(16),
        row![select, clear].spacing(8).align_y(alignment::Vertical::Center),
        summarize,
    ]
    .spacing(12);

    if let Some(placeholder) = status::library_placeholder(state) {
        panel = panel.push(
            container(text(placeholder).size(14))
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Center),
        );
    }

    panel.into()
}

fn summary_panel(state: &AppState) -> iced::widget::Column<'_, Message> {
    let mut panel = column![text("Summary:").size(18)].spacing(10);

    if !state.summary.is_empty() {
        panel = panel.push(
            container(text(render::markdown_to_text(&state.summary)).size(15))
                .padding(16)
                .width(Length::Fill)
                .style(container::rounded_box),
        );
    } else if let Some(placeholder) = status::summary_placeholder(state) {
        panel = panel.push(text(placeholder).size(14));
    }

    panel
}

fn qa_panel(state: &AppState) -> iced::widget::Column<'_, Message> {
    let mut question = text_input("Ask a question about the PDF...", &state.question)
        .padding(10)
        .size(15);
    if state.active.is_some() && !state.is_loading() {
        // Enter and the Ask button raise the same event.
        question = question
            .on_input(|value| on(Event::QuestionChanged(value)))
            .on_submit(on(Event::Ask));
    }

    let ask = button(text("Ask").size(15))
        .padding([10, 28])
        .on_press_maybe(state.can_ask().then(|| on(Event::Ask)));

    let mut panel = column![
        text("Questions:").size(18),
        row![question, ask].spacing(12).align_y(alignment::Vertical::Center),
    ]
    .spacing(10);

    if !state.answer.is_empty() {
        panel = panel.push(
            container(
                column![
                    text("Answer:").size(15).style(text::primary),
                    text(render::markdown_to_text(&state.answer)).size(15),
                ]
                .spacing(6),
            )
            .padding(16)
            .width(Length::Fill)
            .style(container::rounded_box),
        );
    }

    panel
}
