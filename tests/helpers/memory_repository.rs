// In-memory repositories for handler contract tests
//
// They follow the same contract as the MySQL repositories: insertion-order
// ids, case-insensitive search, conflicts on unique columns, NotFound on
// missing ids. No database is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use ngopi::core::controller::SharedRepository;
use ngopi::core::{AppError, ResourcePage, ResourceQuery, ResourceRepository, Result};
use ngopi::modules::cafes::{Cafe, CafeChanges, CafeFilter, Cafes, NewCafe};
use ngopi::modules::facilities::{
    Facilities, Facility, FacilityChanges, FacilityFilter, NewFacility,
};
use ngopi::modules::recommendations::{
    NewRecommendation, Recommendation, RecommendationChanges, RecommendationFilter,
    Recommendations,
};
use ngopi::modules::reviews::{NewReview, Review, ReviewChanges, ReviewFilter, Reviews};
use ngopi::modules::terms::{NewTerm, Term, TermChanges, TermFilter, Terms};

/// Rows plus the next id, behind one lock
pub struct MemoryTable<T> {
    inner: Mutex<(Vec<T>, i64)>,
}

impl<T: Clone> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new((Vec::new(), 1)),
        }
    }
}

impl<T: Clone> MemoryTable<T> {
    fn page<F>(&self, query: &ResourceQuery<F>, keep: impl Fn(&T) -> bool) -> ResourcePage<T> {
        let guard = self.inner.lock().unwrap();
        let matching: Vec<T> = guard.0.iter().filter(|row| keep(*row)).cloned().collect();
        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        ResourcePage::new(data, total, query)
    }

    fn insert(&self, build: impl FnOnce(i64) -> T) -> T {
        let mut guard = self.inner.lock().unwrap();
        let id = guard.1;
        guard.1 += 1;
        let row = build(id);
        guard.0.push(row.clone());
        row
    }

    fn rows(&self) -> Vec<T> {
        self.inner.lock().unwrap().0.clone()
    }

    fn modify(&self, pick: impl Fn(&T) -> bool, apply: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.inner.lock().unwrap();
        let row = guard.0.iter_mut().find(|row| pick(row))?;
        apply(row);
        Some(row.clone())
    }

    fn remove(&self, pick: impl Fn(&T) -> bool) -> bool {
        let mut guard = self.inner.lock().unwrap();
        let before = guard.0.len();
        guard.0.retain(|row| !pick(row));
        guard.0.len() < before
    }
}

fn contains(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => haystack
            .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}

fn missing(label: &str, id: i64) -> AppError {
    AppError::not_found(format!("{} with id {} not found", label, id))
}

// Facilities

#[derive(Default)]
pub struct MemoryFacilities {
    table: MemoryTable<Facility>,
}

impl MemoryFacilities {
    pub fn shared() -> SharedRepository<Facilities> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ResourceRepository<Facilities> for MemoryFacilities {
    async fn find(&self, query: &ResourceQuery<FacilityFilter>) -> Result<ResourcePage<Facility>> {
        let search = query.search.as_deref();
        Ok(self.table.page(query, |f| {
            query.id.map_or(true, |id| f.id == id)
                && (contains(Some(&f.name), search) || contains(f.description.as_deref(), search))
        }))
    }

    async fn create(&self, payload: NewFacility) -> Result<Facility> {
        let taken = self
            .table
            .rows()
            .iter()
            .any(|f| f.name == payload.name || f.slug == payload.slug);
        if taken {
            return Err(AppError::conflict("Facility already exists"));
        }

        let now = Utc::now();
        Ok(self.table.insert(|id| Facility {
            id,
            name: payload.name,
            slug: payload.slug,
            icon: payload.icon,
            description: payload.description,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i64, changes: FacilityChanges) -> Result<Facility> {
        self.table
            .modify(
                |f| f.id == id,
                |f| {
                    if let Some(name) = changes.name {
                        f.name = name;
                    }
                    if let Some(slug) = changes.slug {
                        f.slug = slug;
                    }
                    if let Some(icon) = changes.icon {
                        f.icon = icon;
                    }
                    if let Some(description) = changes.description {
                        f.description = description;
                    }
                    f.updated_at = Utc::now();
                },
            )
            .ok_or_else(|| missing("Facility", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if self.table.remove(|f| f.id == id) {
            Ok(())
        } else {
            Err(missing("Facility", id))
        }
    }
}

// Terms

#[derive(Default)]
pub struct MemoryTerms {
    table: MemoryTable<Term>,
}

impl MemoryTerms {
    pub fn shared() -> SharedRepository<Terms> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ResourceRepository<Terms> for MemoryTerms {
    async fn find(&self, query: &ResourceQuery<TermFilter>) -> Result<ResourcePage<Term>> {
        let search = query.search.as_deref();
        Ok(self.table.page(query, |t| {
            query.id.map_or(true, |id| t.id == id)
                && query
                    .filter
                    .content_status
                    .map_or(true, |status| t.content_status == status)
                && (contains(Some(&t.name), search) || contains(t.description.as_deref(), search))
        }))
    }

    async fn create(&self, payload: NewTerm) -> Result<Term> {
        let taken = self
            .table
            .rows()
            .iter()
            .any(|t| t.name == payload.name || t.slug == payload.slug);
        if taken {
            return Err(AppError::conflict("Term already exists"));
        }

        let now = Utc::now();
        Ok(self.table.insert(|id| Term {
            id,
            name: payload.name,
            slug: payload.slug,
            description: payload.description,
            content_status: payload.content_status,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i64, changes: TermChanges) -> Result<Term> {
        self.table
            .modify(
                |t| t.id == id,
                |t| {
                    if let Some(name) = changes.name {
                        t.name = name;
                    }
                    if let Some(slug) = changes.slug {
                        t.slug = slug;
                    }
                    if let Some(description) = changes.description {
                        t.description = description;
                    }
                    if let Some(status) = changes.content_status {
                        t.content_status = status;
                    }
                    t.updated_at = Utc::now();
                },
            )
            .ok_or_else(|| missing("Term", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if self.table.remove(|t| t.id == id) {
            Ok(())
        } else {
            Err(missing("Term", id))
        }
    }
}

// Reviews

/// Reviews for a fixed set of existing cafe ids
pub struct MemoryReviews {
    table: MemoryTable<Review>,
    cafe_ids: Vec<i64>,
}

impl MemoryReviews {
    pub fn shared(cafe_ids: Vec<i64>) -> SharedRepository<Reviews> {
        Arc::new(Self {
            table: MemoryTable::default(),
            cafe_ids,
        })
    }

    fn check_cafe(&self, cafe_id: i64) -> Result<()> {
        if self.cafe_ids.contains(&cafe_id) {
            Ok(())
        } else {
            Err(AppError::invalid_field(
                "cafeId",
                "references a record that does not exist",
            ))
        }
    }
}

#[async_trait]
impl ResourceRepository<Reviews> for MemoryReviews {
    async fn find(&self, query: &ResourceQuery<ReviewFilter>) -> Result<ResourcePage<Review>> {
        let search = query.search.as_deref();
        let filter = &query.filter;
        Ok(self.table.page(query, |r| {
            query.id.map_or(true, |id| r.id == id)
                && filter.rating.map_or(true, |rating| r.rating == rating)
                && filter.visitor_type.map_or(true, |v| r.visitor_type == v)
                && filter.cafe_id.map_or(true, |id| r.cafe_id == id)
                && (contains(Some(&r.reviewer_name), search)
                    || contains(r.comment.as_deref(), search))
        }))
    }

    async fn create(&self, payload: NewReview) -> Result<Review> {
        self.check_cafe(payload.cafe_id)?;

        let now = Utc::now();
        Ok(self.table.insert(|id| Review {
            id,
            cafe_id: payload.cafe_id,
            reviewer_name: payload.reviewer_name,
            rating: payload.rating,
            visitor_type: payload.visitor_type,
            comment: payload.comment,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i64, changes: ReviewChanges) -> Result<Review> {
        if let Some(cafe_id) = changes.cafe_id {
            self.check_cafe(cafe_id)?;
        }

        self.table
            .modify(
                |r| r.id == id,
                |r| {
                    if let Some(cafe_id) = changes.cafe_id {
                        r.cafe_id = cafe_id;
                    }
                    if let Some(name) = changes.reviewer_name {
                        r.reviewer_name = name;
                    }
                    if let Some(rating) = changes.rating {
                        r.rating = rating;
                    }
                    if let Some(visitor_type) = changes.visitor_type {
                        r.visitor_type = visitor_type;
                    }
                    if let Some(comment) = changes.comment {
                        r.comment = comment;
                    }
                    r.updated_at = Utc::now();
                },
            )
            .ok_or_else(|| missing("Review", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if self.table.remove(|r| r.id == id) {
            Ok(())
        } else {
            Err(missing("Review", id))
        }
    }
}

// Cafes and recommendations

/// Cafe and recommendation repositories over shared tables, so deleting a
/// cafe removes its recommendation and recommendations must name a real cafe
pub fn memory_directory() -> (SharedRepository<Cafes>, SharedRepository<Recommendations>) {
    let cafes = Arc::new(MemoryTable::<Cafe>::default());
    let recommendations = Arc::new(MemoryTable::<Recommendation>::default());

    (
        Arc::new(MemoryCafes {
            table: cafes.clone(),
            recommendations: recommendations.clone(),
        }),
        Arc::new(MemoryRecommendations {
            table: recommendations,
            cafes,
        }),
    )
}

pub struct MemoryCafes {
    table: Arc<MemoryTable<Cafe>>,
    recommendations: Arc<MemoryTable<Recommendation>>,
}

#[async_trait]
impl ResourceRepository<Cafes> for MemoryCafes {
    async fn find(&self, query: &ResourceQuery<CafeFilter>) -> Result<ResourcePage<Cafe>> {
        let search = query.search.as_deref();
        let filter = &query.filter;
        Ok(self.table.page(query, |c| {
            query.id.map_or(true, |id| c.id == id)
                && filter.cafe_type.map_or(true, |t| c.cafe_type == t)
                && filter.content_status.map_or(true, |s| c.content_status == s)
                && (contains(Some(&c.name), search) || contains(c.description.as_deref(), search))
        }))
    }

    async fn create(&self, payload: NewCafe) -> Result<Cafe> {
        if self.table.rows().iter().any(|c| c.slug == payload.slug) {
            return Err(AppError::conflict("Cafe already exists"));
        }

        let now = Utc::now();
        Ok(self.table.insert(|id| Cafe {
            id,
            name: payload.name,
            slug: payload.slug,
            description: payload.description,
            address: payload.address,
            cafe_type: payload.cafe_type,
            content_status: payload.content_status,
            image_url: payload.image_url,
            opening_hours: payload.opening_hours,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i64, changes: CafeChanges) -> Result<Cafe> {
        if let Some(slug) = &changes.slug {
            if self.table.rows().iter().any(|c| c.id != id && &c.slug == slug) {
                return Err(AppError::conflict("Cafe already exists"));
            }
        }

        self.table
            .modify(
                |c| c.id == id,
                |c| {
                    if let Some(name) = changes.name {
                        c.name = name;
                    }
                    if let Some(slug) = changes.slug {
                        c.slug = slug;
                    }
                    if let Some(description) = changes.description {
                        c.description = description;
                    }
                    if let Some(address) = changes.address {
                        c.address = address;
                    }
                    if let Some(cafe_type) = changes.cafe_type {
                        c.cafe_type = cafe_type;
                    }
                    if let Some(status) = changes.content_status {
                        c.content_status = status;
                    }
                    if let Some(image_url) = changes.image_url {
                        c.image_url = image_url;
                    }
                    if let Some(hours) = changes.opening_hours {
                        c.opening_hours = hours;
                    }
                    c.updated_at = Utc::now();
                },
            )
            .ok_or_else(|| missing("Cafe", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if !self.table.remove(|c| c.id == id) {
            return Err(missing("Cafe", id));
        }
        self.recommendations.remove(|r| r.cafe_id == id);
        Ok(())
    }
}

pub struct MemoryRecommendations {
    table: Arc<MemoryTable<Recommendation>>,
    cafes: Arc<MemoryTable<Cafe>>,
}

impl MemoryRecommendations {
    fn check(&self, id: Option<i64>, cafe_id: i64) -> Result<()> {
        if !self.cafes.rows().iter().any(|c| c.id == cafe_id) {
            return Err(AppError::invalid_field(
                "cafeId",
                "references a record that does not exist",
            ));
        }
        let taken = self
            .table
            .rows()
            .iter()
            .any(|r| r.cafe_id == cafe_id && Some(r.id) != id);
        if taken {
            return Err(AppError::conflict(
                "Recommendation for this cafe already exists",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceRepository<Recommendations> for MemoryRecommendations {
    async fn find(
        &self,
        query: &ResourceQuery<RecommendationFilter>,
    ) -> Result<ResourcePage<Recommendation>> {
        let search = query.search.as_deref();
        let filter = &query.filter;
        Ok(self.table.page(query, |r| {
            query.id.map_or(true, |id| r.id == id)
                && filter.content_status.map_or(true, |s| r.content_status == s)
                && filter.cafe_id.map_or(true, |id| r.cafe_id == id)
                && (contains(Some(&r.title), search) || contains(r.description.as_deref(), search))
        }))
    }

    async fn create(&self, payload: NewRecommendation) -> Result<Recommendation> {
        self.check(None, payload.cafe_id)?;

        let now = Utc::now();
        Ok(self.table.insert(|id| Recommendation {
            id,
            cafe_id: payload.cafe_id,
            title: payload.title,
            description: payload.description,
            content_status: payload.content_status,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i64, changes: RecommendationChanges) -> Result<Recommendation> {
        if let Some(cafe_id) = changes.cafe_id {
            self.check(Some(id), cafe_id)?;
        }

        self.table
            .modify(
                |r| r.id == id,
                |r| {
                    if let Some(cafe_id) = changes.cafe_id {
                        r.cafe_id = cafe_id;
                    }
                    if let Some(title) = changes.title {
                        r.title = title;
                    }
                    if let Some(description) = changes.description {
                        r.description = description;
                    }
                    if let Some(status) = changes.content_status {
                        r.content_status = status;
                    }
                    r.updated_at = Utc::now();
                },
            )
            .ok_or_else(|| missing("Recommendation", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if self.table.remove(|r| r.id == id) {
            Ok(())
        } else {
            Err(missing("Recommendation", id))
        }
    }
}
