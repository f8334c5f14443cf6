use super::*;

impl LayoutController {
    /// Registers a settled-layout subscriber.
    pub fn subscribe(&mut self, observer: Arc<dyn LayoutObserver>) {
        self.observers.push(observer);
    }

    /// Returns whether mutations happened since the last settle.
    #[must_use]
    pub fn has_unsettled_changes(&self) -> bool {
        self.revision != self.settled_revision
    }

    /// Returns the cards whose content was clipped at the last measurement.
    #[must_use]
    pub fn overflowing(&self) -> &BTreeSet<String> {
        &self.overflowing
    }

    /// Returns whether a card was clipped at the last measurement.
    #[must_use]
    pub fn is_overflowing(&self, section_id: &str) -> bool {
        self.overflowing.contains(section_id)
    }

    /// Measures every card and rebuilds the overflowing set.
    pub fn detect_overflow(&mut self) -> &BTreeSet<String> {
        self.overflowing = self
            .sections
            .iter()
            .filter(|section| {
                self.measurer
                    .measure(section.id().as_str())
                    .is_some_and(|content| content.is_clipped())
            })
            .map(|section| section.id().as_str().to_owned())
            .collect();

        &self.overflowing
    }

    /// Closes the current mutation batch.
    ///
    /// When anything changed since the previous settle, overflow is
    /// re-measured, observers are notified and the event is returned.
    /// Otherwise nothing happens.
    pub fn settle(&mut self) -> Option<LayoutSettled> {
        if !self.has_unsettled_changes() {
            return None;
        }

        self.settled_revision = self.revision;
        self.detect_overflow();

        let event = LayoutSettled {
            page_id: self.page_id.clone(),
            revision: self.revision,
            dimensions: self.dimensions,
            overflowing: self.overflowing.clone(),
        };
        for observer in &self.observers {
            observer.layout_settled(&event);
        }

        Some(event)
    }
}
