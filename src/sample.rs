//! Fixed catalogue served by the public reads while no store is configured.

use once_cell::sync::Lazy;

use folio_db::{Filter, Record, Stored};

use crate::modules::books::models::Book;
use crate::modules::carousel::models::CarouselItem;
use crate::modules::categories::models::Category;

static BOOKS: Lazy<Vec<Stored<Book>>> = Lazy::new(|| {
    vec![
        sample_book(
            "1",
            "Mathematics-1",
            "Konch, De & Paul",
            "ISBN-1001",
            "Polytechnic Courses",
            "math1",
            "Mathematics 1 for diploma engineering students.",
        ),
        sample_book(
            "2",
            "VOCLET (Theory & MCQ)",
            "Kundu & Kundu",
            "ISBN-1002",
            "Vocational Courses",
            "voclet",
            "VOCLET practice and theory.",
        ),
        sample_book(
            "3",
            "Bangla Mentor-X",
            "Alok Baran",
            "ISBN-1003",
            "CBSE, ICSE and WBBSE Courses",
            "bangla",
            "Bangla mentor for class X.",
        ),
    ]
});

static CATEGORIES: Lazy<Vec<Stored<Category>>> = Lazy::new(|| {
    [
        ("c1", "Polytechnic Courses", "/samples/cat-poly.png"),
        ("c2", "Vocational Courses", "/samples/cat-voc.png"),
        ("c3", "CBSE, ICSE and WBBSE Courses", "/samples/cat-cbse.png"),
    ]
    .into_iter()
    .map(|(id, name, thumbnail)| {
        Stored::detached(
            id,
            Category {
                name: name.to_string(),
                thumbnail: Some(thumbnail.to_string()),
            },
        )
    })
    .collect()
});

static CAROUSEL: Lazy<Vec<Stored<CarouselItem>>> = Lazy::new(|| {
    vec![Stored::detached(
        "c1",
        CarouselItem {
            title: Some("Sample Poster".to_string()),
            image_url: "/samples/book-placeholder.png".to_string(),
            order: 0,
            active: true,
        },
    )]
});

fn sample_book(
    id: &str,
    title: &str,
    author: &str,
    isbn: &str,
    category: &str,
    cover: &str,
    description: &str,
) -> Stored<Book> {
    Stored::detached(
        id,
        Book {
            title: title.to_string(),
            author: author.to_string(),
            isbn: Some(isbn.to_string()),
            category: Some(category.to_string()),
            front_cover: Some(format!("/samples/{}-front.jpg", cover)),
            back_cover: Some(format!("/samples/{}-back.jpg", cover)),
            description: Some(description.to_string()),
        },
    )
}

/// Sample books matching `filter`, evaluated the way the memory backend evaluates it.
pub fn books(filter: &Filter) -> Vec<Stored<Book>> {
    BOOKS
        .iter()
        .filter(|book| as_record(book).is_some_and(|record| filter.matches(&record)))
        .cloned()
        .collect()
}

/// Sample books are addressed by their short ids, not ObjectIds.
pub fn book(id: &str) -> Option<Stored<Book>> {
    BOOKS.iter().find(|book| book.id == id).cloned()
}

pub fn categories() -> Vec<Stored<Category>> {
    CATEGORIES.clone()
}

pub fn carousel() -> Vec<Stored<CarouselItem>> {
    CAROUSEL.iter().filter(|item| item.doc.active).cloned().collect()
}

fn as_record<T: serde::Serialize>(value: &T) -> Option<Record> {
    match serde_json::to_value(value).ok()? {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}
